use undulate_types::transport_events::TransportEvent;

const SECONDS_PER_MINUTE: f64 = 60.0;
const MIN_PLAY_SPEED: f32 = 0.00001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportSettings {
    pub tempo_bpm: f32,
    pub beat_unit: u32,
    pub play_speed: f32,
    pub start_sample: i64,
    /// Blocks between transport updates. `None` sends a single update.
    pub resend_interval: Option<usize>,
}

/// Stands in for a plugin host's transport: reports tempo, meter and song
/// position at the start of selected blocks and moves the position forward
/// while playing.
#[derive(Debug)]
pub struct SimulatedTransport {
    settings: TransportSettings,
    sample_rate: f64,
    position: i64,
}

impl SimulatedTransport {
    pub fn new(settings: TransportSettings, sample_rate: f64) -> Self {
        log::debug!("Constructing Simulated Transport Module");
        Self {
            settings,
            sample_rate,
            position: settings.start_sample,
        }
    }

    /// The update for block `block_index`, if one is due. Advances the song
    /// position by `n_samples` either way.
    pub fn next_block(&mut self, block_index: usize, n_samples: usize) -> Option<TransportEvent> {
        let is_due = match self.settings.resend_interval {
            Some(interval) => block_index % interval.max(1) == 0,
            None => block_index == 0,
        };

        let event = is_due.then(|| {
            TransportEvent::at_frame(0)
                .with_tempo(self.settings.tempo_bpm)
                .with_beat_unit(self.settings.beat_unit)
                .with_bar_beat(self.bar_beat())
                .with_absolute_sample(self.position)
                .with_play_speed(self.settings.play_speed)
        });

        if self.is_playing() {
            self.position = self.position.saturating_add(n_samples as i64);
        }
        event
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    fn is_playing(&self) -> bool {
        self.settings.play_speed > MIN_PLAY_SPEED
    }

    /// Beats elapsed since the song start.
    fn bar_beat(&self) -> f32 {
        let frames_per_beat =
            SECONDS_PER_MINUTE / f64::from(self.settings.tempo_bpm.max(1.0)) * self.sample_rate;
        (self.position as f64 / frames_per_beat) as f32
    }
}
