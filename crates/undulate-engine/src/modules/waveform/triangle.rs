/// Reflects the saw so the output rises and falls once per period.
#[inline]
pub fn triangle_from_saw(saw: f32) -> f32 {
    if saw > 0.0 {
        (-saw + 1.0) * 2.0 - 1.0
    } else {
        (saw + 1.0) * 2.0 - 1.0
    }
}
