//! SSE/AVX kernels
//! 
//! Both kernels broadcast one entry of `lhs` across a row of `rhs` and sum the three
//! partial rows as `(p0 + p1) + p2`, the same order the scalar loop uses. The scalar loop
//! starts from `0.`, so a `-0.` entry there comes out as `+0.`; otherwise results are equal.
#[cfg(target_arch="x86")]
use core::arch::x86::{__m128, __m256, _mm_add_ps, _mm_mul_ps, _mm_set1_ps, _mm_setr_ps, _mm_storeu_ps, _mm256_add_ps, _mm256_mul_ps, _mm256_setr_ps, _mm256_storeu_ps};
#[cfg(target_arch="x86_64")]
use core::arch::x86_64::{__m128, __m256, _mm_add_ps, _mm_mul_ps, _mm_set1_ps, _mm_setr_ps, _mm_storeu_ps, _mm256_add_ps, _mm256_mul_ps, _mm256_setr_ps, _mm256_storeu_ps};

use super::Rows;

/// Load a row into the low three lanes (fourth lane is zero)
#[inline]
#[target_feature(enable = "sse")]
unsafe fn load_row(row: &[f32; 3]) -> __m128 {
    _mm_setr_ps(row[0], row[1], row[2], 0.)
}

/// Multiply one row at a time in 128-bit registers
/// 
/// ## Safety
/// The CPU must support SSE.
#[target_feature(enable = "sse")]
pub(super) unsafe fn matmul_sse(lhs: &Rows, rhs: &Rows) -> Rows {
    let b0 = load_row(&rhs[0]);
    let b1 = load_row(&rhs[1]);
    let b2 = load_row(&rhs[2]);

    let mut result = [[0.; 3]; 3];
    for (dst, row) in result.iter_mut().zip(lhs.iter()) {
        let acc = _mm_add_ps(
            _mm_mul_ps(_mm_set1_ps(row[0]), b0),
            _mm_mul_ps(_mm_set1_ps(row[1]), b1),
        );
        let acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(row[2]), b2));

        let mut lanes = [0f32; 4];
        _mm_storeu_ps(lanes.as_mut_ptr(), acc);
        *dst = [lanes[0], lanes[1], lanes[2]];
    }
    result
}

/// Same row in both 128-bit halves
#[inline]
#[target_feature(enable = "avx")]
unsafe fn dup_row(row: &[f32; 3]) -> __m256 {
    _mm256_setr_ps(row[0], row[1], row[2], 0., row[0], row[1], row[2], 0.)
}

/// `u` in the low half, `v` in the high half
#[inline]
#[target_feature(enable = "avx")]
unsafe fn splat_pair(u: f32, v: f32) -> __m256 {
    _mm256_setr_ps(u, u, u, 0., v, v, v, 0.)
}

/// Compute the output rows for `first` and `second` in one register
#[inline]
#[target_feature(enable = "avx")]
unsafe fn row_pair(first: &[f32; 3], second: &[f32; 3], rhs: &[__m256; 3]) -> [[f32; 3]; 2] {
    let acc = _mm256_add_ps(
        _mm256_mul_ps(splat_pair(first[0], second[0]), rhs[0]),
        _mm256_mul_ps(splat_pair(first[1], second[1]), rhs[1]),
    );
    let acc = _mm256_add_ps(acc, _mm256_mul_ps(splat_pair(first[2], second[2]), rhs[2]));

    let mut lanes = [0f32; 8];
    _mm256_storeu_ps(lanes.as_mut_ptr(), acc);
    [
        [lanes[0], lanes[1], lanes[2]],
        [lanes[4], lanes[5], lanes[6]],
    ]
}

/// Multiply two rows at a time in 256-bit registers
/// 
/// ## Safety
/// The CPU must support AVX.
#[target_feature(enable = "avx")]
pub(super) unsafe fn matmul_avx(lhs: &Rows, rhs: &Rows) -> Rows {
    let b = [
        dup_row(&rhs[0]),
        dup_row(&rhs[1]),
        dup_row(&rhs[2]),
    ];

    let [r0, r1] = row_pair(&lhs[0], &lhs[1], &b);
    // Last row is duplicated; the high half is discarded
    let [r2, _] = row_pair(&lhs[2], &lhs[2], &b);
    [r0, r1, r2]
}
