use undulate_types::defaults::Defaults;
use undulate_types::grid::GridStep;
use undulate_types::math::{bipolar_to_range, range_to_bipolar};

const NO_SHIFT: f32 = 0.5;

/// Output range of every waveform. An inverted range is swapped on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    minimum: f32,
    maximum: f32,
}

impl Default for Range {
    fn default() -> Self {
        Self {
            minimum: Defaults::RANGE_MINIMUM,
            maximum: Defaults::RANGE_MAXIMUM,
        }
    }
}

impl Range {
    pub fn new(low: f32, high: f32) -> Self {
        if !low.is_finite() || !high.is_finite() {
            return Self::default();
        }

        Self {
            minimum: low.min(high),
            maximum: low.max(high),
        }
    }

    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    #[inline]
    pub fn remap(&self, value: f32) -> f32 {
        bipolar_to_range(value, self.minimum, self.maximum)
    }

    /// Inverse of `remap`.
    #[inline]
    pub fn unmap(&self, value: f32) -> f32 {
        range_to_bipolar(value, self.minimum, self.maximum)
    }
}

/// Per-sample transforms applied around waveform generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePipeline {
    pub horizontal_invert: bool,
    pub shift: f32,
    pub step_mode: bool,
    pub grid_step: GridStep,
    pub vertical_invert: bool,
    pub range: Range,
}

impl Default for SamplePipeline {
    fn default() -> Self {
        Self {
            horizontal_invert: Defaults::HORIZONTAL_INVERT,
            shift: Defaults::SHIFT,
            step_mode: Defaults::STEP_MODE,
            grid_step: Defaults::GRID_STEP,
            vertical_invert: Defaults::VERTICAL_INVERT,
            range: Range::default(),
        }
    }
}

impl SamplePipeline {
    /// Mirror, shift and quantize the phase. The result is in [0, period).
    #[inline]
    pub fn transform_phase(&self, phase_sample: i64, period_samples: i64) -> f64 {
        let period_samples = period_samples.max(1);
        let mut phase = phase_sample.rem_euclid(period_samples);

        if self.horizontal_invert {
            phase = mirror_phase(phase, period_samples);
        }

        phase = shift_phase(phase, period_samples, self.shift);

        if self.step_mode {
            quantize_phase(phase, period_samples, self.grid_step.divisor())
        } else {
            phase as f64
        }
    }

    /// Vertical mirror followed by the range remap.
    #[inline]
    pub fn transform_value(&self, value: f32) -> f32 {
        let value = if self.vertical_invert { -value } else { value };
        self.range.remap(value)
    }
}

#[inline]
pub fn mirror_phase(phase_sample: i64, period_samples: i64) -> i64 {
    let mirrored = period_samples - phase_sample;
    if mirrored >= period_samples { 0 } else { mirrored }
}

/// `shift` is in [0, 1] with 0.5 as the centre. Each side moves the phase by up
/// to half a period, forwards above the centre and backwards below it.
#[inline]
pub fn shift_phase(phase_sample: i64, period_samples: i64, shift: f32) -> i64 {
    let shift = if shift.is_finite() {
        shift.clamp(0.0, 1.0)
    } else {
        NO_SHIFT
    };
    let half_period = period_samples as f64 / 2.0;

    let offset = if shift > NO_SHIFT {
        ((f64::from(shift - NO_SHIFT) * 2.0) * half_period).round() as i64
    } else if shift < NO_SHIFT {
        -((f64::from(NO_SHIFT - shift) * 2.0) * half_period).round() as i64
    } else {
        0
    };

    (phase_sample + offset).rem_euclid(period_samples)
}

/// Snaps the phase to the centre of its grid step.
#[inline]
pub fn quantize_phase(phase_sample: i64, period_samples: i64, divisor: u32) -> f64 {
    let step_size = period_samples as f64 / f64::from(divisor.max(1));
    (phase_sample as f64 / step_size).floor() * step_size + step_size / 2.0
}
