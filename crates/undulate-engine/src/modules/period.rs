use crate::modules::transport::TransportState;
use std::f64::consts::TAU;
use undulate_types::defaults::Defaults;
use undulate_types::math::parameters_are_equal;
use undulate_types::sync::{SyncRate, SyncRateType, sync_rate_to_fraction};

const SECONDS_PER_MINUTE: f64 = 60.0;
const MIN_PERIOD_SAMPLES: i64 = 1;
const TIMING_DIAGNOSTIC_INTERVAL_BLOCKS: u32 = 1024;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorMode {
    #[default]
    FreeRunning,
    Synced,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorState {
    /// The mode actually in effect; synced without known timing runs free.
    pub mode: OscillatorMode,
    pub frequency_hz: f64,
    pub period_samples: i64,
    pub phase_sample: i64,
    pub sine_coeff: f64,
    pub saw_coeff: f64,
}

impl Default for OscillatorState {
    fn default() -> Self {
        Self {
            mode: OscillatorMode::FreeRunning,
            frequency_hz: f64::from(Defaults::FREQUENCY),
            period_samples: MIN_PERIOD_SAMPLES,
            phase_sample: 0,
            sine_coeff: 0.0,
            saw_coeff: 0.0,
        }
    }
}

impl OscillatorState {
    /// Moves one sample forward, wrapping at the period boundary.
    #[inline]
    pub fn advance(&mut self) {
        self.phase_sample += 1;
        if self.phase_sample >= self.period_samples {
            self.phase_sample = 0;
        }
    }
}

/// The parameters whose change forces a recalculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecalculationInputs {
    pub is_freerunning: bool,
    pub frequency_hz: f32,
    pub sync_rate: SyncRate,
    pub sync_rate_type: SyncRateType,
}

impl RecalculationInputs {
    pub fn sync_fraction(&self) -> f32 {
        sync_rate_to_fraction(self.sync_rate, self.sync_rate_type)
    }
}

pub fn parameters_changed(
    previous: Option<&RecalculationInputs>,
    current: &RecalculationInputs,
) -> bool {
    let Some(previous) = previous else {
        return true;
    };

    previous.is_freerunning != current.is_freerunning
        || !parameters_are_equal(previous.frequency_hz, current.frequency_hz)
        || previous.sync_rate != current.sync_rate
        || previous.sync_rate_type != current.sync_rate_type
}

pub fn is_timing_unavailable(is_freerunning: bool, transport: &TransportState) -> bool {
    !is_freerunning && !transport.is_timing_known()
}

#[inline]
fn sanitize_frequency(raw_frequency_hz: f32) -> f64 {
    if !raw_frequency_hz.is_finite() {
        return f64::from(Defaults::MINIMUM_FREQUENCY);
    }
    f64::from(raw_frequency_hz.max(Defaults::MINIMUM_FREQUENCY))
}

pub fn effective_frequency(
    is_freerunning: bool,
    raw_frequency_hz: f32,
    transport: &TransportState,
    sync_fraction: f32,
) -> f64 {
    if is_freerunning || !transport.is_timing_known() {
        return sanitize_frequency(raw_frequency_hz);
    }

    let frequency = f64::from(transport.tempo_bpm)
        / (SECONDS_PER_MINUTE * f64::from(transport.beat_unit) * f64::from(sync_fraction));

    if frequency.is_finite() && frequency > 0.0 {
        frequency
    } else {
        sanitize_frequency(raw_frequency_hz)
    }
}

#[inline]
fn period_from_samples(samples: f64) -> i64 {
    (samples.round() as i64).max(MIN_PERIOD_SAMPLES)
}

pub fn recalculate(
    inputs: &RecalculationInputs,
    transport: &TransportState,
    sample_rate: f64,
) -> OscillatorState {
    let sync_fraction = inputs.sync_fraction();
    let frequency_hz = effective_frequency(
        inputs.is_freerunning,
        inputs.frequency_hz,
        transport,
        sync_fraction,
    );

    let sine_coeff = TAU * frequency_hz / sample_rate;
    let saw_coeff = frequency_hz / sample_rate;

    if inputs.is_freerunning || !transport.is_timing_known() {
        return OscillatorState {
            mode: OscillatorMode::FreeRunning,
            frequency_hz,
            period_samples: period_from_samples(sample_rate / frequency_hz),
            phase_sample: 0,
            sine_coeff,
            saw_coeff,
        };
    }

    let frames_per_beat = transport.frames_per_beat(sample_rate);
    let period_samples = period_from_samples(
        frames_per_beat * f64::from(transport.beat_unit) * f64::from(sync_fraction),
    );

    OscillatorState {
        mode: OscillatorMode::Synced,
        frequency_hz,
        period_samples,
        phase_sample: transport.absolute_sample.rem_euclid(period_samples),
        sine_coeff,
        saw_coeff,
    }
}

/// Rate limits the "timing unavailable" warning by counting blocks.
#[derive(Debug, Default)]
pub struct TimingDiagnostics {
    blocks_since_report: u32,
    has_reported: bool,
}

impl TimingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once per block. Returns true when a warning was emitted.
    pub fn observe(&mut self, is_unavailable: bool) -> bool {
        if !is_unavailable {
            self.blocks_since_report = 0;
            self.has_reported = false;
            return false;
        }

        if self.has_reported && self.blocks_since_report < TIMING_DIAGNOSTIC_INTERVAL_BLOCKS {
            self.blocks_since_report += 1;
            return false;
        }

        log::warn!(
            target: "lfo::period",
            "Have not received time info from host yet. Beat unit is unknown, using the free running frequency"
        );
        self.blocks_since_report = 0;
        self.has_reported = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use undulate_types::transport_events::TransportEvent;

    const SAMPLE_RATE: f64 = 48_000.0;

    fn freerunning_inputs(frequency_hz: f32) -> RecalculationInputs {
        RecalculationInputs {
            is_freerunning: true,
            frequency_hz,
            sync_rate: SyncRate::Quarter,
            sync_rate_type: SyncRateType::Normal,
        }
    }

    fn synced_inputs(sync_rate: SyncRate, sync_rate_type: SyncRateType) -> RecalculationInputs {
        RecalculationInputs {
            is_freerunning: false,
            frequency_hz: 1.0,
            sync_rate,
            sync_rate_type,
        }
    }

    fn known_transport(tempo_bpm: f32, beat_unit: u32, absolute_sample: i64) -> TransportState {
        TransportState {
            tempo_bpm,
            beat_unit,
            absolute_sample,
            play_speed: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn one_hertz_freerunning_at_48k_has_a_48000_sample_period() {
        let state = recalculate(
            &freerunning_inputs(1.0),
            &TransportState::default(),
            SAMPLE_RATE,
        );

        assert_eq!(state.period_samples, 48_000);
        assert_eq!(state.phase_sample, 0);
        assert_eq!(state.mode, OscillatorMode::FreeRunning);
    }

    #[test]
    fn synced_quarter_note_at_120_bpm_in_four_four_is_24000_samples() {
        let state = recalculate(
            &synced_inputs(SyncRate::Quarter, SyncRateType::Normal),
            &known_transport(120.0, 4, 0),
            SAMPLE_RATE,
        );

        assert_eq!(state.period_samples, 24_000);
        assert_eq!(state.mode, OscillatorMode::Synced);
        assert!((state.frequency_hz - 2.0).abs() < 1e-9);
    }

    #[test]
    fn synced_phase_is_locked_to_the_absolute_song_position() {
        let state = recalculate(
            &synced_inputs(SyncRate::Quarter, SyncRateType::Normal),
            &known_transport(120.0, 4, 50_000),
            SAMPLE_RATE,
        );

        assert_eq!(state.phase_sample, 50_000 % 24_000);
    }

    #[test]
    fn negative_song_position_still_yields_a_phase_inside_the_period() {
        let state = recalculate(
            &synced_inputs(SyncRate::Quarter, SyncRateType::Normal),
            &known_transport(120.0, 4, -100),
            SAMPLE_RATE,
        );

        assert_eq!(state.phase_sample, 24_000 - 100);
    }

    #[test]
    fn synced_without_timing_falls_back_to_the_raw_frequency() {
        let mut inputs = synced_inputs(SyncRate::Eighth, SyncRateType::Dotted);
        inputs.frequency_hz = 4.0;
        let transport = known_transport(120.0, 0, 12_345);

        let state = recalculate(&inputs, &transport, SAMPLE_RATE);

        assert_eq!(state.mode, OscillatorMode::FreeRunning);
        assert_eq!(state.period_samples, 12_000);
        assert_eq!(state.phase_sample, 0);
        assert!(is_timing_unavailable(false, &transport));
    }

    #[test]
    fn effective_frequency_clamps_the_raw_frequency_to_the_minimum() {
        let transport = TransportState::default();

        let actual = effective_frequency(true, -5.0, &transport, 0.25);
        let expected = f64::from(Defaults::MINIMUM_FREQUENCY);

        assert!((actual - expected).abs() < 1e-12);
        let nan_actual = effective_frequency(true, f32::NAN, &transport, 0.25);
        assert!((nan_actual - expected).abs() < 1e-12);
    }

    #[test]
    fn infinite_frequency_falls_back_to_a_finite_period() {
        let transport = TransportState::default();
        let expected = f64::from(Defaults::MINIMUM_FREQUENCY);

        for raw_frequency_hz in [f32::INFINITY, f32::NEG_INFINITY] {
            let actual = effective_frequency(true, raw_frequency_hz, &transport, 0.25);
            assert!((actual - expected).abs() < 1e-12, "For: {raw_frequency_hz:?}");
        }

        let state = recalculate(&freerunning_inputs(f32::INFINITY), &transport, SAMPLE_RATE);
        assert!(state.sine_coeff.is_finite());
        assert!(state.saw_coeff.is_finite());
        assert!(state.period_samples >= 1);
    }

    #[test]
    fn coefficients_are_derived_from_the_effective_frequency() {
        let state = recalculate(&freerunning_inputs(2.0), &TransportState::default(), SAMPLE_RATE);

        assert!((state.sine_coeff - TAU * 2.0 / SAMPLE_RATE).abs() < 1e-15);
        assert!((state.saw_coeff - 2.0 / SAMPLE_RATE).abs() < 1e-15);
    }

    #[test]
    fn period_is_never_shorter_than_one_sample() {
        let state = recalculate(&freerunning_inputs(1_000_000.0), &TransportState::default(), 100.0);

        assert_eq!(state.period_samples, 1);
    }

    #[test]
    fn recalculate_is_idempotent() {
        let inputs = synced_inputs(SyncRate::Sixteenth, SyncRateType::Triplet);
        let transport = known_transport(97.5, 4, 777_777);

        let first = recalculate(&inputs, &transport, SAMPLE_RATE);
        let second = recalculate(&inputs, &transport, SAMPLE_RATE);

        assert_eq!(first, second);
    }

    #[test]
    fn parameters_changed_is_true_without_a_previous_block() {
        assert!(parameters_changed(None, &freerunning_inputs(1.0)));
    }

    #[test]
    fn parameters_changed_ignores_sub_epsilon_frequency_jitter() {
        let previous = freerunning_inputs(1.0);
        let current = freerunning_inputs(1.00005);

        assert!(!parameters_changed(Some(&previous), &current));
    }

    #[test]
    fn parameters_changed_detects_each_tracked_input() {
        let previous = freerunning_inputs(1.0);

        let mut frequency = previous;
        frequency.frequency_hz = 1.5;
        let mut mode = previous;
        mode.is_freerunning = false;
        let mut rate = previous;
        rate.sync_rate = SyncRate::Half;
        let mut rate_type = previous;
        rate_type.sync_rate_type = SyncRateType::Dotted;

        for current in [frequency, mode, rate, rate_type] {
            assert!(parameters_changed(Some(&previous), &current), "For: {current:?}");
        }
    }

    #[test]
    fn advance_wraps_to_zero_at_the_period_boundary() {
        let mut state = OscillatorState {
            period_samples: 3,
            phase_sample: 1,
            ..Default::default()
        };

        state.advance();
        assert_eq!(state.phase_sample, 2);
        state.advance();
        assert_eq!(state.phase_sample, 0);
    }

    #[test]
    fn timing_diagnostics_reports_once_then_waits_for_the_interval() {
        let mut diagnostics = TimingDiagnostics::new();

        assert!(diagnostics.observe(true));
        for _ in 0..TIMING_DIAGNOSTIC_INTERVAL_BLOCKS {
            assert!(!diagnostics.observe(true));
        }
        assert!(diagnostics.observe(true));
    }

    #[test]
    fn timing_diagnostics_reports_again_after_timing_was_recovered() {
        let mut diagnostics = TimingDiagnostics::new();
        assert!(diagnostics.observe(true));
        assert!(!diagnostics.observe(true));

        assert!(!diagnostics.observe(false));

        assert!(diagnostics.observe(true));
    }

    #[test]
    fn recalculation_after_a_transport_event_uses_the_new_position() {
        let mut tracker = crate::modules::transport::TransportTracker::new();
        tracker.apply_transport_event(
            &TransportEvent::at_frame(0)
                .with_tempo(120.0)
                .with_beat_unit(4)
                .with_absolute_sample(30_000),
        );

        let state = recalculate(
            &synced_inputs(SyncRate::Quarter, SyncRateType::Normal),
            tracker.state(),
            SAMPLE_RATE,
        );

        assert_eq!(state.phase_sample, 6_000);
    }
}
