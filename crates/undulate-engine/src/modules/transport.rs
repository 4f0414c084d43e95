use undulate_types::defaults::Defaults;
use undulate_types::transport_events::TransportEvent;

const SECONDS_PER_MINUTE: f32 = 60.0;
const MIN_TEMPO_BPM: f32 = 1.0;

/// Last known host transport facts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportState {
    pub tempo_bpm: f32,
    /// 0 means the host has not reported a meter yet.
    pub beat_unit: u32,
    /// Host sample position of the first frame of the current block.
    pub absolute_sample: i64,
    pub play_speed: f32,
    pub beat_offset: f32,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            tempo_bpm: Defaults::TEMPO_BPM,
            beat_unit: Defaults::UNKNOWN_BEAT_UNIT,
            absolute_sample: 0,
            play_speed: Defaults::PLAY_SPEED,
            beat_offset: 0.0,
        }
    }
}

impl TransportState {
    pub fn is_timing_known(&self) -> bool {
        self.beat_unit != Defaults::UNKNOWN_BEAT_UNIT
    }

    pub fn is_playing(&self) -> bool {
        self.play_speed > 0.00001
    }

    pub fn frames_per_beat(&self, sample_rate: f64) -> f64 {
        f64::from(SECONDS_PER_MINUTE) / f64::from(self.tempo_bpm) * sample_rate
    }
}

#[derive(Debug, Default)]
pub struct TransportTracker {
    state: TransportState,
    is_changed: bool,
}

impl TransportTracker {
    pub fn new() -> Self {
        log::debug!("Constructing Transport Tracker Module");
        Self::default()
    }

    pub fn apply_transport_event(&mut self, event: &TransportEvent) {
        if let Some(tempo_bpm) = event.tempo_bpm
            && tempo_bpm.is_finite()
        {
            self.state.tempo_bpm = tempo_bpm.max(MIN_TEMPO_BPM);
        }

        if let Some(play_speed) = event.play_speed
            && play_speed.is_finite()
        {
            self.state.play_speed = play_speed;
        }

        if let Some(beat_unit) = event.beat_unit {
            self.state.beat_unit = beat_unit;
        }

        if let Some(absolute_sample) = event.absolute_sample {
            self.state.absolute_sample =
                absolute_sample.saturating_sub(i64::from(event.frame_offset));
        }

        if let Some(bar_beat) = event.bar_beat
            && bar_beat.is_finite()
        {
            self.state.beat_offset = bar_beat.rem_euclid(1.0);
        }

        self.is_changed = true;
    }

    pub fn apply_transport_events(&mut self, events: &[TransportEvent]) {
        for event in events {
            self.apply_transport_event(event);
        }
    }

    /// Moves the song position past a block the host played, so an update
    /// that carries no position still locks to the current sample.
    pub fn advance(&mut self, n_samples: usize, sample_rate: f64) {
        if !self.state.is_playing() {
            return;
        }

        self.state.absolute_sample = self.state.absolute_sample.saturating_add(n_samples as i64);
        let beats = n_samples as f64 / self.state.frames_per_beat(sample_rate);
        if beats.is_finite() {
            self.state.beat_offset =
                (f64::from(self.state.beat_offset) + beats).rem_euclid(1.0) as f32;
        }
    }

    pub fn is_timing_known(&self) -> bool {
        self.state.is_timing_known()
    }

    /// Returns whether any event arrived since the last call and clears the flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.is_changed)
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }
}
