//! Dense 3x3 single-precision matrices for real-time graphics and physics code.
//!
//! [`Mat33`] is a plain value type: nine `f32` entries in row-major order, no heap
//! storage and no interior mutability. Concurrent reads of a matrix are fine; mutating
//! one shared instance from several threads at once is a data race the caller must
//! prevent.

pub mod math;
pub(crate) mod ffi;

pub use math::{approx_eq, EPSILON, Vec3};
pub use math::mat::{Mat33, MatError, MatMulKernel};
