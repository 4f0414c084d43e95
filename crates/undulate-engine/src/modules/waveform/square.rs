#[inline]
pub fn square_from_saw(saw: f32) -> f32 {
    if saw < 0.0 { -1.0 } else { 1.0 }
}
