//! C ABI over row-major `float[9]` matrices and `float[3]` vectors
//!
//! Every function rejects null pointers (returning `false`, or NaN for scalars)
//! and never writes to an output buffer when it returns `false`.
use libc::c_float;

use crate::{Mat33, Vec3};

/// Read 9 floats from a possibly-unaligned buffer
unsafe fn read_mat(ptr: *const c_float) -> Option<Mat33> {
    if ptr.is_null() {
        return None;
    }
    let entries = ptr.cast::<[c_float; 9]>().read_unaligned();
    Some(Mat33::from(entries))
}

unsafe fn write_mat(ptr: *mut c_float, value: &Mat33) -> bool {
    if ptr.is_null() {
        return false;
    }
    let entries: [c_float; 9] = bytemuck::cast(*value);
    ptr.cast::<[c_float; 9]>().write_unaligned(entries);
    true
}

unsafe fn read_vec(ptr: *const c_float) -> Option<Vec3> {
    if ptr.is_null() {
        return None;
    }
    let components = ptr.cast::<[c_float; 3]>().read_unaligned();
    Some(Vec3::from(components))
}

unsafe fn write_vec(ptr: *mut c_float, value: Vec3) -> bool {
    if ptr.is_null() {
        return false;
    }
    ptr.cast::<[c_float; 3]>().write_unaligned(value.into());
    true
}

/// Write the identity matrix to `out`.
#[no_mangle]
pub unsafe extern "C" fn mathengine_mat33_identity(out: *mut c_float) -> bool {
    write_mat(out, &Mat33::identity())
}

/// Determinant of `m`, or NaN if `m` is null.
#[no_mangle]
pub unsafe extern "C" fn mathengine_mat33_determinant(m: *const c_float) -> c_float {
    match read_mat(m) {
        Some(m) => m.determinant(),
        None => c_float::NAN,
    }
}

/// Compute `lhs * rhs` into `out`. `out` may alias either input.
#[no_mangle]
pub unsafe extern "C" fn mathengine_mat33_multiply(lhs: *const c_float, rhs: *const c_float, out: *mut c_float) -> bool {
    let (Some(lhs), Some(rhs)) = (read_mat(lhs), read_mat(rhs)) else {
        return false;
    };
    write_mat(out, &(lhs * rhs))
}

/// Compute `m * v` into `out` (3 floats).
#[no_mangle]
pub unsafe extern "C" fn mathengine_mat33_multiply_vec3(m: *const c_float, v: *const c_float, out: *mut c_float) -> bool {
    let (Some(m), Some(v)) = (read_mat(m), read_vec(v)) else {
        return false;
    };
    write_vec(out, m * v)
}

/// Write the inverse of `m` into `out`.
///
/// Returns false if the determinant of `m` is exactly zero; `out` is untouched.
#[no_mangle]
pub unsafe extern "C" fn mathengine_mat33_inverse(m: *const c_float, out: *mut c_float) -> bool {
    let Some(m) = read_mat(m) else {
        return false;
    };
    match m.inv() {
        Some(inv) => write_mat(out, &inv),
        None => false,
    }
}

/// Write the transpose of `m` into `out`. `out` may alias `m`.
#[no_mangle]
pub unsafe extern "C" fn mathengine_mat33_transpose(m: *const c_float, out: *mut c_float) -> bool {
    let Some(m) = read_mat(m) else {
        return false;
    };
    write_mat(out, &m.transposed())
}

#[cfg(test)]
mod test {
    use std::ptr;

    use super::*;

    #[test]
    fn identity() {
        let mut out = [7f32; 9];
        assert!(unsafe { mathengine_mat33_identity(out.as_mut_ptr()) });
        assert_eq!(out, [1., 0., 0., 0., 1., 0., 0., 0., 1.]);
        assert!(!unsafe { mathengine_mat33_identity(ptr::null_mut()) });
    }

    #[test]
    fn determinant() {
        let m = [2f32, 0., 0., 0., 3., 0., 0., 0., 4.];
        assert_eq!(unsafe { mathengine_mat33_determinant(m.as_ptr()) }, 24.);
        assert!(unsafe { mathengine_mat33_determinant(ptr::null()) }.is_nan());
    }

    #[test]
    fn multiply_in_place() {
        let mut a = [1f32, 2., 3., 4., 5., 6., 7., 8., 9.];
        let b = [9f32, 8., 7., 6., 5., 4., 3., 2., 1.];
        let out = a.as_mut_ptr();
        assert!(unsafe { mathengine_mat33_multiply(out, b.as_ptr(), out) });
        assert_eq!(a, [30., 24., 18., 84., 69., 54., 138., 114., 90.]);
    }

    #[test]
    fn multiply_vec3() {
        let m = [1f32, 2., 3., 0., 1., 4., 5., 6., 0.];
        let v = [1f32, 2., 3.];
        let mut out = [0f32; 3];
        assert!(unsafe { mathengine_mat33_multiply_vec3(m.as_ptr(), v.as_ptr(), out.as_mut_ptr()) });
        assert_eq!(out, [14., 14., 17.]);
        assert!(!unsafe { mathengine_mat33_multiply_vec3(m.as_ptr(), ptr::null(), out.as_mut_ptr()) });
    }

    #[test]
    fn inverse() {
        let m = [1f32, 2., 3., 0., 1., 4., 5., 6., 0.];
        let mut out = [0f32; 9];
        assert!(unsafe { mathengine_mat33_inverse(m.as_ptr(), out.as_mut_ptr()) });
        assert_eq!(out, [-24., 18., 5., 20., -15., -4., -5., 4., 1.]);

        let singular = [1f32, 2., 3., 2., 4., 6., 7., 8., 9.];
        let mut out = [5f32; 9];
        assert!(!unsafe { mathengine_mat33_inverse(singular.as_ptr(), out.as_mut_ptr()) });
        assert_eq!(out, [5f32; 9]);
    }

    #[test]
    fn transpose_in_place() {
        let mut m = [1f32, 2., 3., 4., 5., 6., 7., 8., 9.];
        let p = m.as_mut_ptr();
        assert!(unsafe { mathengine_mat33_transpose(p, p) });
        assert_eq!(m, [1., 4., 7., 2., 5., 8., 3., 6., 9.]);
    }
}
