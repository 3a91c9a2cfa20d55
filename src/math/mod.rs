mod vec3;
pub use vec3::Vec3;

pub mod mat;

use float_cmp::{ApproxEq, F32Margin};

/// Absolute tolerance used by [approx_eq] and by `==` on matrices
pub const EPSILON: f32 = 1e-5;

/// Check if two floats are equal within [EPSILON]
/// 
/// Values that differ by more than [EPSILON] compare unequal no matter how large they are.
/// NaN is never equal to anything, itself included.
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    a.approx_eq(b, F32Margin { epsilon: EPSILON, ulps: 0 })
}
