/// Descending ramp: +1 at phase 0 falling towards -1 at the end of the period.
#[inline]
pub fn saw(phase: f64, saw_coeff: f64) -> f32 {
    let ramp = (phase * saw_coeff).rem_euclid(1.0) as f32;
    -(ramp * 2.0 - 1.0)
}
