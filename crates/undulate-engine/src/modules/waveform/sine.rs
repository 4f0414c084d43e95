#[inline]
pub fn sine(phase: f64, sine_coeff: f64) -> f32 {
    (phase * sine_coeff).sin() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;
    use undulate_types::math::f32s_are_equal;

    const PERIOD: f64 = 48_000.0;
    const SINE_COEFF: f64 = TAU / PERIOD;

    #[test]
    fn sine_starts_at_zero_and_peaks_at_a_quarter_period() {
        assert!(f32s_are_equal(sine(0.0, SINE_COEFF), 0.0));
        assert!(f32s_are_equal(sine(PERIOD / 4.0, SINE_COEFF), 1.0));
        assert!(f32s_are_equal(sine(PERIOD * 3.0 / 4.0, SINE_COEFF), -1.0));
    }

    #[test]
    fn sine_stays_inside_the_bipolar_range() {
        for phase in (0..48_000).step_by(97) {
            let value = sine(f64::from(phase), SINE_COEFF);
            assert!((-1.0..=1.0).contains(&value), "For: {phase:?}, got: {value:?}");
        }
    }
}
