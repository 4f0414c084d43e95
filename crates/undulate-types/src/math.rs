use std::sync::atomic::Ordering::Relaxed;
use std::sync::atomic::{AtomicU32, AtomicU64};

const ALTERNATE_EPSILON: f32 = 1e-6;
pub const PARAMETER_CHANGE_EPSILON: f32 = 1e-4;

#[inline]
pub fn f32s_are_equal(value_1: f32, value_2: f32) -> bool {
    if value_1.is_nan() && value_2.is_nan() {
        return true;
    }
    if value_1.is_infinite() && value_2.is_infinite() {
        return value_1.signum() == value_2.signum();
    }

    (value_1 - value_2).abs() <= ALTERNATE_EPSILON
}

#[inline]
pub fn parameters_are_equal(value_1: f32, value_2: f32) -> bool {
    if value_1.is_nan() && value_2.is_nan() {
        return true;
    }

    (value_1 - value_2).abs() < PARAMETER_CHANGE_EPSILON
}

#[inline]
pub fn store_f32_as_atomic_u32(atomic: &AtomicU32, value: f32) {
    atomic.store(value.to_bits(), Relaxed);
}

#[inline]
pub fn load_f32_from_atomic_u32(atomic: &AtomicU32) -> f32 {
    f32::from_bits(atomic.load(Relaxed))
}

#[inline]
pub fn store_f64_as_atomic_u64(atomic: &AtomicU64, value: f64) {
    atomic.store(value.to_bits(), Relaxed);
}

#[inline]
pub fn load_f64_from_atomic_u64(atomic: &AtomicU64) -> f64 {
    f64::from_bits(atomic.load(Relaxed))
}

#[inline]
pub fn bipolar_to_range(value: f32, minimum: f32, maximum: f32) -> f32 {
    minimum + ((value + 1.0) / 2.0) * (maximum - minimum)
}

#[inline]
pub fn range_to_bipolar(value: f32, minimum: f32, maximum: f32) -> f32 {
    let range = maximum - minimum;
    if range.abs() <= ALTERNATE_EPSILON {
        return 0.0;
    }

    ((value - minimum) / range) * 2.0 - 1.0
}

#[inline]
pub fn contains_nonzero(samples: &[f32]) -> bool {
    samples
        .iter()
        .any(|sample| sample.abs() > PARAMETER_CHANGE_EPSILON)
}
