use std::ops::{Index, IndexMut, Add, AddAssign, Sub, SubAssign, Mul, MulAssign, Div, DivAssign};

use bytemuck::{Pod, Zeroable};
use float_cmp::{ApproxEq, F32Margin};

use crate::math::{approx_eq, Vec3};

use super::{MatError, MatMulKernel};


/// 3x3 matrix of `f32`, stored row-major
///
/// Equality (`==`) compares every entry with [approx_eq](crate::approx_eq).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default)]
pub struct Mat33([[f32; 3]; 3]);

// SAFETY: transparent wrapper around a Pod array
unsafe impl Zeroable for Mat33 {}
unsafe impl Pod for Mat33 {}

impl ApproxEq for Mat33 {
    type Margin = F32Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        let margin: Self::Margin = margin.into();
        self.as_slice().iter()
            .zip(other.as_slice().iter())
            .all(|(&u, &v)| u.approx_eq(v, margin))
    }
}

impl Mat33 {
    /// Create from entries in row-major order
    ///
    /// `[[a, b, c], [d, e, f], [g, h, i]]`
    #[allow(clippy::too_many_arguments)]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32, g: f32, h: f32, i: f32) -> Self {
        Self([
            [a, b, c],
            [d, e, f],
            [g, h, i],
        ])
    }

    /// Create from rows
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self(rows)
    }

    /// Create matrix with all zeroes
    pub const fn zeroes() -> Self {
        Self([[0.; 3]; 3])
    }

    /// Create an identity matrix
    pub const fn identity() -> Self {
        Self::new(
            1., 0., 0.,
            0., 1., 0.,
            0., 0., 1.,
        )
    }

    /// Rows of this matrix
    pub const fn rows(&self) -> &[[f32; 3]; 3] {
        &self.0
    }

    /// All 9 entries in row-major order
    pub fn as_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.0)
    }

    /// Get a row without bounds checking
    ///
    /// ## Safety
    /// `row` must be less than 3.
    #[inline(always)]
    pub unsafe fn row_unchecked(&self, row: usize) -> &[f32; 3] {
        debug_assert!(row < 3);
        self.0.get_unchecked(row)
    }

    /// Get a mutable row without bounds checking
    ///
    /// ## Safety
    /// `row` must be less than 3.
    #[inline(always)]
    pub unsafe fn row_unchecked_mut(&mut self, row: usize) -> &mut [f32; 3] {
        debug_assert!(row < 3);
        self.0.get_unchecked_mut(row)
    }

    /// Get an entry without bounds checking
    ///
    /// ## Safety
    /// Both `row` and `col` must be less than 3.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> f32 {
        debug_assert!(col < 3);
        *self.row_unchecked(row).get_unchecked(col)
    }

    /// Determinant, by cofactor expansion along the first row
    pub fn determinant(&self) -> f32 {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.0;
        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    }

    /// Write the inverse of this matrix into `out`
    ///
    /// Returns false, leaving `out` untouched, if the determinant is exactly zero.
    /// Nearly singular matrices still produce a (badly conditioned) result.
    pub fn inverse_into(&self, out: &mut Mat33) -> bool {
        let det = self.determinant();
        if det == 0. {
            tracing::trace!(matrix = ?self.0, "determinant is zero; matrix is not invertible");
            return false;
        }

        let inv_det = 1. / det;
        let m = &self.0;

        out.0 = [
            [
                inv_det * (m[1][1] * m[2][2] - m[1][2] * m[2][1]),
                -inv_det * (m[0][1] * m[2][2] - m[0][2] * m[2][1]),
                inv_det * (m[0][1] * m[1][2] - m[0][2] * m[1][1]),
            ],
            [
                -inv_det * (m[1][0] * m[2][2] - m[1][2] * m[2][0]),
                inv_det * (m[0][0] * m[2][2] - m[0][2] * m[2][0]),
                -inv_det * (m[0][0] * m[1][2] - m[0][2] * m[1][0]),
            ],
            [
                inv_det * (m[1][0] * m[2][1] - m[1][1] * m[2][0]),
                -inv_det * (m[0][0] * m[2][1] - m[0][1] * m[2][0]),
                inv_det * (m[0][0] * m[1][1] - m[0][1] * m[1][0]),
            ],
        ];
        true
    }

    /// Matrix inverse
    ///
    /// Returns None if this matrix is (exactly) singular.
    pub fn inv(&self) -> Option<Mat33> {
        let mut res = Self::zeroes();
        if self.inverse_into(&mut res) {
            Some(res)
        } else {
            None
        }
    }

    /// In-place inverse
    ///
    /// `self` is always overwritten: when the matrix is singular this returns false
    /// and `self` becomes the zero matrix.
    pub fn inverse(&mut self) -> bool {
        let mut res = Self::zeroes();
        let invertible = self.inverse_into(&mut res);
        *self = res;
        invertible
    }

    /// Transpose
    pub const fn transposed(&self) -> Self {
        let m = &self.0;
        Self([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// In-place transpose
    pub fn transpose(&mut self) -> &mut Self {
        *self = self.transposed();
        self
    }

    /// Matrix multiplication with a specific kernel
    ///
    /// See also: [MatMulKernel::detected]
    pub fn matmul_with(&self, rhs: &Mat33, kernel: MatMulKernel) -> Result<Mat33, MatError> {
        kernel.apply(&self.0, &rhs.0).map(Self)
    }

    /// Matrix multiplication with the kernel used by `*`
    #[inline]
    pub fn matmul(&self, rhs: &Mat33) -> Self {
        let kernel = MatMulKernel::for_operator();
        // SAFETY: the operator kernel is always available
        Self(unsafe { kernel.apply_unchecked(&self.0, &rhs.0) })
    }

    /// Matrix-vector product
    pub fn transform(&self, v: &Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    #[inline]
    fn map_elements(&self, map_fn: impl Fn(f32) -> f32) -> Self {
        Self(self.0.map(|row| row.map(&map_fn)))
    }

    #[inline]
    fn zip_elements(&self, rhs: &Mat33, zip_fn: impl Fn(f32, f32) -> f32) -> Self {
        let mut res = *self;
        res.zip_inplace(rhs, zip_fn);
        res
    }

    #[inline]
    fn zip_inplace(&mut self, rhs: &Mat33, zip_fn: impl Fn(f32, f32) -> f32) {
        for (row, rhs_row) in self.0.iter_mut().zip(rhs.0.iter()) {
            for (e, &r) in row.iter_mut().zip(rhs_row.iter()) {
                *e = zip_fn(*e, r);
            }
        }
    }

    /// Multiply every entry by `scalar`
    pub fn scale(&self, scalar: f32) -> Self {
        self.map_elements(|e| e * scalar)
    }

    /// Multiply every entry by `scalar`, in place
    pub fn scale_inplace(&mut self, scalar: f32) {
        for e in self.0.iter_mut().flatten() {
            *e *= scalar;
        }
    }
}

impl From<[[f32; 3]; 3]> for Mat33 {
    fn from(value: [[f32; 3]; 3]) -> Self {
        Self(value)
    }
}

/// Row-major entries
impl From<[f32; 9]> for Mat33 {
    fn from(value: [f32; 9]) -> Self {
        bytemuck::cast(value)
    }
}

impl From<Mat33> for [[f32; 3]; 3] {
    fn from(value: Mat33) -> Self {
        value.0
    }
}

/// Row-major entries (must be exactly 9)
impl TryFrom<&[f32]> for Mat33 {
    type Error = MatError;

    fn try_from(value: &[f32]) -> Result<Self, Self::Error> {
        let entries: [f32; 9] = value.try_into()
            .map_err(|_| MatError::WrongLength { actual: value.len(), expected: 9 })?;
        Ok(Self::from(entries))
    }
}

impl PartialEq for Mat33 {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice().iter()
            .zip(other.as_slice().iter())
            .all(|(&u, &v)| approx_eq(u, v))
    }
}

/// Row access
///
/// Panics if `row >= 3`; see [Mat33::row_unchecked] for the unchecked version.
impl Index<usize> for Mat33 {
    type Output = [f32; 3];

    #[inline]
    fn index(&self, row: usize) -> &Self::Output {
        &self.0[row]
    }
}

impl IndexMut<usize> for Mat33 {
    #[inline]
    fn index_mut(&mut self, row: usize) -> &mut Self::Output {
        &mut self.0[row]
    }
}

impl Index<(usize, usize)> for Mat33 {
    type Output = f32;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.0[row][col]
    }
}

impl IndexMut<(usize, usize)> for Mat33 {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.0[row][col]
    }
}

impl Add<&Mat33> for &Mat33 {
    type Output = Mat33;

    fn add(self, rhs: &Mat33) -> Self::Output {
        self.zip_elements(rhs, |u, v| u + v)
    }
}

impl Add<&Mat33> for Mat33 {
    type Output = Mat33;

    fn add(mut self, rhs: &Mat33) -> Self::Output {
        self += rhs;
        self
    }
}

impl Add<Mat33> for Mat33 {
    type Output = Mat33;

    fn add(self, rhs: Mat33) -> Self::Output {
        self + &rhs
    }
}

impl AddAssign<&Mat33> for Mat33 {
    fn add_assign(&mut self, rhs: &Mat33) {
        self.zip_inplace(rhs, |u, v| u + v);
    }
}

impl AddAssign<Mat33> for Mat33 {
    fn add_assign(&mut self, rhs: Mat33) {
        *self += &rhs;
    }
}

impl Sub<&Mat33> for &Mat33 {
    type Output = Mat33;

    fn sub(self, rhs: &Mat33) -> Self::Output {
        self.zip_elements(rhs, |u, v| u - v)
    }
}

impl Sub<&Mat33> for Mat33 {
    type Output = Mat33;

    fn sub(mut self, rhs: &Mat33) -> Self::Output {
        self -= rhs;
        self
    }
}

impl Sub<Mat33> for Mat33 {
    type Output = Mat33;

    fn sub(self, rhs: Mat33) -> Self::Output {
        self - &rhs
    }
}

impl SubAssign<&Mat33> for Mat33 {
    fn sub_assign(&mut self, rhs: &Mat33) {
        self.zip_inplace(rhs, |u, v| u - v);
    }
}

impl SubAssign<Mat33> for Mat33 {
    fn sub_assign(&mut self, rhs: Mat33) {
        *self -= &rhs;
    }
}

impl Mul<f32> for Mat33 {
    type Output = Mat33;

    fn mul(mut self, rhs: f32) -> Self::Output {
        self.scale_inplace(rhs);
        self
    }
}

impl Mul<f32> for &Mat33 {
    type Output = Mat33;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

impl Mul<Mat33> for f32 {
    type Output = Mat33;

    fn mul(self, rhs: Mat33) -> Self::Output {
        rhs * self
    }
}

impl MulAssign<f32> for Mat33 {
    fn mul_assign(&mut self, rhs: f32) {
        self.scale_inplace(rhs);
    }
}

/// Scale by reciprocal (division by zero gives infinite entries)
impl Div<f32> for Mat33 {
    type Output = Mat33;

    fn div(self, rhs: f32) -> Self::Output {
        self * rhs.recip()
    }
}

impl Div<f32> for &Mat33 {
    type Output = Mat33;

    fn div(self, rhs: f32) -> Self::Output {
        self.scale(rhs.recip())
    }
}

impl DivAssign<f32> for Mat33 {
    fn div_assign(&mut self, rhs: f32) {
        self.scale_inplace(rhs.recip());
    }
}

impl Mul<&Mat33> for &Mat33 {
    type Output = Mat33;

    fn mul(self, rhs: &Mat33) -> Self::Output {
        self.matmul(rhs)
    }
}

impl Mul<Mat33> for Mat33 {
    type Output = Mat33;

    fn mul(self, rhs: Mat33) -> Self::Output {
        self.matmul(&rhs)
    }
}

/// Right-multiplication: `a *= b` is `a = a * b`
impl MulAssign<&Mat33> for Mat33 {
    fn mul_assign(&mut self, rhs: &Mat33) {
        *self = self.matmul(rhs);
    }
}

impl MulAssign<Mat33> for Mat33 {
    fn mul_assign(&mut self, rhs: Mat33) {
        *self = self.matmul(&rhs);
    }
}

impl Mul<&Vec3> for &Mat33 {
    type Output = Vec3;

    fn mul(self, rhs: &Vec3) -> Self::Output {
        self.transform(rhs)
    }
}

impl Mul<Vec3> for Mat33 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        self.transform(&rhs)
    }
}
