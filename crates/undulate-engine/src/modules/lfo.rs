use crate::modules::parameters::ParameterSnapshot;
use crate::modules::period::{
    OscillatorMode, OscillatorState, RecalculationInputs, TimingDiagnostics,
    is_timing_unavailable, parameters_changed, recalculate,
};
use crate::modules::telemetry::{TelemetryPublisher, TelemetryReader, telemetry_channel};
use crate::modules::transport::{TransportState, TransportTracker};
use crate::modules::trigger::TriggerController;
use crate::modules::waveform::random::{RandomSource, RandomWalk, ThreadRandom};
use crate::modules::waveform::{WaveformFrame, generate_frame};
use strum::EnumCount;
use thiserror::Error;
use undulate_types::curve::{CurveNode, MAX_CURVE_NODES, MIN_CURVE_NODES};
use undulate_types::telemetry::TelemetrySnapshot;
use undulate_types::transport_events::TransportEvent;
use undulate_types::waveform::Waveform;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LfoError {
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    #[error("Curve has {count} nodes, at least {minimum} are required")]
    TooFewCurveNodes { count: usize, minimum: usize },

    #[error("Curve has {count} nodes, at most {maximum} are allowed")]
    TooManyCurveNodes { count: usize, maximum: usize },

    #[error("Curve node {index} has position {position}, outside of 0 to 1")]
    CurveNodeOutOfRange { index: usize, position: f32 },

    #[error("Curve node {index} at position {position} comes before the previous node")]
    UnorderedCurveNodes { index: usize, position: f32 },
}

/// Checks a node list before it is handed to the engine. The engine itself
/// never rejects a curve; this is for editors and command line input.
pub fn validate_curve_nodes(nodes: &[CurveNode]) -> Result<(), LfoError> {
    if nodes.len() < MIN_CURVE_NODES {
        return Err(LfoError::TooFewCurveNodes {
            count: nodes.len(),
            minimum: MIN_CURVE_NODES,
        });
    }
    if nodes.len() > MAX_CURVE_NODES {
        return Err(LfoError::TooManyCurveNodes {
            count: nodes.len(),
            maximum: MAX_CURVE_NODES,
        });
    }

    let mut previous_position = 0.0;
    for (index, node) in nodes.iter().enumerate() {
        if !(0.0..=1.0).contains(&node.position) {
            return Err(LfoError::CurveNodeOutOfRange {
                index,
                position: node.position,
            });
        }
        if node.position < previous_position {
            return Err(LfoError::UnorderedCurveNodes {
                index,
                position: node.position,
            });
        }
        previous_position = node.position;
    }

    Ok(())
}

/// Everything the engine reads for one block.
#[derive(Debug, Clone, Copy)]
pub struct BlockInputs<'a> {
    pub parameters: &'a ParameterSnapshot,
    pub transport_events: &'a [TransportEvent],
    pub trigger_cv: Option<&'a [f32]>,
}

impl<'a> BlockInputs<'a> {
    pub fn new(parameters: &'a ParameterSnapshot) -> Self {
        Self {
            parameters,
            transport_events: &[],
            trigger_cv: None,
        }
    }

    pub fn with_transport_events(mut self, transport_events: &'a [TransportEvent]) -> Self {
        self.transport_events = transport_events;
        self
    }

    pub fn with_trigger_cv(mut self, trigger_cv: &'a [f32]) -> Self {
        self.trigger_cv = Some(trigger_cv);
        self
    }
}

/// Output buffers, one optional slot per waveform. Waveforms without a
/// buffer are still generated so every output stays on the same phase.
#[derive(Debug, Default)]
pub struct BlockOutputs<'a> {
    buffers: [Option<&'a mut [f32]>; Waveform::COUNT],
}

impl<'a> BlockOutputs<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, waveform: Waveform, buffer: &'a mut [f32]) -> Self {
        self.set_output(waveform, buffer);
        self
    }

    pub fn set_output(&mut self, waveform: Waveform, buffer: &'a mut [f32]) {
        self.buffers[waveform as usize] = Some(buffer);
    }

    #[inline]
    fn write_frame(&mut self, index: usize, frame: &WaveformFrame) {
        for (buffer, value) in self.buffers.iter_mut().zip(frame.values()) {
            if let Some(buffer) = buffer
                && let Some(sample) = buffer.get_mut(index)
            {
                *sample = *value;
            }
        }
    }
}

pub struct Lfo {
    sample_rate: f64,
    transport: TransportTracker,
    oscillator: OscillatorState,
    previous_inputs: Option<RecalculationInputs>,
    timing_diagnostics: TimingDiagnostics,
    trigger: TriggerController,
    random_walk: RandomWalk,
    random_source: Box<dyn RandomSource + Send>,
    telemetry: TelemetryPublisher,
}

impl Lfo {
    pub fn new(sample_rate: f64) -> Result<Self, LfoError> {
        log::debug!("Constructing LFO Module");
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(LfoError::InvalidSampleRate(sample_rate));
        }

        let (telemetry, _) = telemetry_channel();

        Ok(Self {
            sample_rate,
            transport: TransportTracker::new(),
            oscillator: OscillatorState::default(),
            previous_inputs: None,
            timing_diagnostics: TimingDiagnostics::new(),
            trigger: TriggerController::new(),
            random_walk: RandomWalk::new(),
            random_source: Box::new(ThreadRandom::new()),
            telemetry,
        })
    }

    pub fn set_random_source(&mut self, random_source: Box<dyn RandomSource + Send>) {
        self.random_source = random_source;
    }

    /// Fills `n_samples` frames of every connected output. Never fails: bad
    /// parameters degrade to safe values and short buffers are filled as far
    /// as they go.
    pub fn process_block(
        &mut self,
        n_samples: usize,
        inputs: &BlockInputs,
        outputs: &mut BlockOutputs,
    ) {
        let parameters = inputs.parameters;

        self.transport.apply_transport_events(inputs.transport_events);
        let is_transport_changed = self.transport.take_changed();
        self.update_oscillator(&parameters.recalculation_inputs(), is_transport_changed);

        self.trigger.apply(
            &mut self.oscillator,
            parameters.trigger,
            inputs.trigger_cv,
        );

        let pipeline = parameters.sample_pipeline();
        let curve = &parameters.curve;
        let is_advancing = self.oscillator.mode == OscillatorMode::FreeRunning
            || self.transport.state().is_playing();

        self.random_walk.begin_block(n_samples);
        for index in 0..n_samples {
            let shifted_phase =
                pipeline.transform_phase(self.oscillator.phase_sample, self.oscillator.period_samples);
            let random_value = self
                .random_walk
                .sample(index, self.random_source.as_mut());

            let frame = generate_frame(shifted_phase, &self.oscillator, curve, random_value)
                .map(|value| pipeline.transform_value(value));
            outputs.write_frame(index, &frame);

            if is_advancing {
                self.oscillator.advance();
            }
        }
        self.transport.advance(n_samples, self.sample_rate);

        self.telemetry.publish(TelemetrySnapshot {
            phase_sample: self.oscillator.phase_sample,
            period_samples: self.oscillator.period_samples,
            sample_rate: self.sample_rate,
            sine_coeff: self.oscillator.sine_coeff,
            saw_coeff: self.oscillator.saw_coeff,
        });
    }

    fn update_oscillator(&mut self, inputs: &RecalculationInputs, is_transport_changed: bool) {
        let transport = self.transport.state();
        let is_synced_transport_change = is_transport_changed
            && !inputs.is_freerunning
            && (transport.is_timing_known() || self.oscillator.mode == OscillatorMode::Synced);

        if is_synced_transport_change || parameters_changed(self.previous_inputs.as_ref(), inputs) {
            let previous_mode = self.oscillator.mode;
            self.oscillator = recalculate(inputs, transport, self.sample_rate);

            if previous_mode != self.oscillator.mode {
                log::debug!(
                    target: "lfo::period",
                    "Oscillator mode changed from {previous_mode:?} to {:?}",
                    self.oscillator.mode
                );
            }
            log::trace!(
                target: "lfo::period",
                period_samples = self.oscillator.period_samples,
                phase_sample = self.oscillator.phase_sample,
                frequency_hz = self.oscillator.frequency_hz;
                "Recalculated oscillator"
            );
        }

        self.timing_diagnostics
            .observe(is_timing_unavailable(inputs.is_freerunning, transport));
        self.previous_inputs = Some(*inputs);
    }

    pub fn oscillator_state(&self) -> &OscillatorState {
        &self.oscillator
    }

    pub fn transport_state(&self) -> &TransportState {
        self.transport.state()
    }

    pub fn triggers_applied(&self) -> u64 {
        self.trigger.triggers_applied()
    }

    /// A handle for an observer thread. Nothing is shared until it attaches.
    pub fn telemetry_reader(&self) -> TelemetryReader {
        self.telemetry.reader()
    }

    pub fn last_telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.last_snapshot()
    }
}
