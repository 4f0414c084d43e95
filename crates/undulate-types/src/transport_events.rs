/// A transport position update from the host. Every field is optional; a
/// missing field leaves the tracked value untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TransportEvent {
    /// Frame within the current block the event refers to.
    pub frame_offset: u32,
    pub tempo_bpm: Option<f32>,
    pub beat_unit: Option<u32>,
    pub bar_beat: Option<f32>,
    pub absolute_sample: Option<i64>,
    pub play_speed: Option<f32>,
}

impl TransportEvent {
    pub fn at_frame(frame_offset: u32) -> Self {
        Self {
            frame_offset,
            ..Default::default()
        }
    }

    pub fn with_tempo(mut self, tempo_bpm: f32) -> Self {
        self.tempo_bpm = Some(tempo_bpm);
        self
    }

    pub fn with_beat_unit(mut self, beat_unit: u32) -> Self {
        self.beat_unit = Some(beat_unit);
        self
    }

    pub fn with_bar_beat(mut self, bar_beat: f32) -> Self {
        self.bar_beat = Some(bar_beat);
        self
    }

    pub fn with_absolute_sample(mut self, absolute_sample: i64) -> Self {
        self.absolute_sample = Some(absolute_sample);
        self
    }

    pub fn with_play_speed(mut self, play_speed: f32) -> Self {
        self.play_speed = Some(play_speed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_only_the_requested_fields() {
        let event = TransportEvent::at_frame(12)
            .with_tempo(128.0)
            .with_absolute_sample(96_000);

        assert_eq!(event.frame_offset, 12);
        assert_eq!(event.tempo_bpm, Some(128.0));
        assert_eq!(event.absolute_sample, Some(96_000));
        assert_eq!(event.beat_unit, None);
        assert_eq!(event.bar_beat, None);
        assert_eq!(event.play_speed, None);
    }
}
