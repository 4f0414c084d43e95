pub mod custom;
pub mod random;
pub mod saw;
pub mod sine;
pub mod square;
pub mod triangle;

use self::custom::custom;
use self::saw::saw;
use self::sine::sine;
use self::square::square_from_saw;
use self::triangle::triangle_from_saw;
use crate::modules::period::OscillatorState;
use strum::EnumCount;
use undulate_types::curve::Curve;
use undulate_types::waveform::Waveform;

/// One raw sample of every waveform for the same phase, indexed by `Waveform`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WaveformFrame([f32; Waveform::COUNT]);

impl WaveformFrame {
    pub fn value(&self, waveform: Waveform) -> f32 {
        self.0[waveform as usize]
    }

    pub fn values(&self) -> &[f32; Waveform::COUNT] {
        &self.0
    }

    pub fn map(self, transform: impl FnMut(f32) -> f32) -> Self {
        Self(self.0.map(transform))
    }
}

/// Generates every waveform at the already shifted phase. `random_value` is the
/// current point of the block's random walk since noise is not a function of phase.
pub fn generate_frame(
    shifted_phase: f64,
    oscillator: &OscillatorState,
    curve: &Curve,
    random_value: f32,
) -> WaveformFrame {
    let saw_value = saw(shifted_phase, oscillator.saw_coeff);
    let position = (shifted_phase / oscillator.period_samples.max(1) as f64) as f32;

    let mut frame = [0.0; Waveform::COUNT];
    frame[Waveform::Sine as usize] = sine(shifted_phase, oscillator.sine_coeff);
    frame[Waveform::Saw as usize] = saw_value;
    frame[Waveform::Triangle as usize] = triangle_from_saw(saw_value);
    frame[Waveform::Square as usize] = square_from_saw(saw_value);
    frame[Waveform::Random as usize] = random_value;
    frame[Waveform::Custom as usize] = custom(position, curve);
    WaveformFrame(frame)
}
