mod reference;

#[cfg(any(target_arch="x86", target_arch="x86_64"))]
mod x86;

use once_cell::sync::Lazy;

use super::MatError;

/// Row-major storage shared by every kernel
type Rows = [[f32; 3]; 3];

/// Strategy used to compute a matrix-matrix product
///
/// Every kernel sums the three partial products of an entry in the same order as
/// [Reference](MatMulKernel::Reference). Callers that need identical results across
/// machines should still request `Reference` explicitly through
/// [Mat33::matmul_with](super::Mat33::matmul_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatMulKernel {
    /// Scalar triple loop, available on every target
    Reference,
    /// 128-bit SSE lanes, one row at a time
    Sse,
    /// 256-bit AVX lanes, two rows per register
    Avx,
}

static DETECTED: Lazy<MatMulKernel> = Lazy::new(|| {
    let kernel = MatMulKernel::available()
        .last()
        .unwrap_or(MatMulKernel::Reference);
    tracing::debug!(?kernel, "selected matrix multiplication kernel");
    kernel
});

impl MatMulKernel {
    /// All kernels, slowest first
    pub const ALL: [MatMulKernel; 3] = [
        MatMulKernel::Reference,
        MatMulKernel::Sse,
        MatMulKernel::Avx,
    ];

    /// Check if the running CPU can execute this kernel
    pub fn is_available(self) -> bool {
        match self {
            Self::Reference => true,
            #[cfg(any(target_arch="x86", target_arch="x86_64"))]
            Self::Sse => is_x86_feature_detected!("sse"),
            #[cfg(any(target_arch="x86", target_arch="x86_64"))]
            Self::Avx => is_x86_feature_detected!("avx"),
            #[cfg(not(any(target_arch="x86", target_arch="x86_64")))]
            Self::Sse | Self::Avx => false,
        }
    }

    /// Kernels the running CPU can execute, slowest first
    pub fn available() -> impl Iterator<Item = MatMulKernel> {
        Self::ALL.into_iter().filter(|kernel| kernel.is_available())
    }

    /// Fastest available kernel (detected once per process)
    pub fn detected() -> Self {
        *DETECTED
    }

    /// Kernel used by the `*` operator
    #[inline]
    pub(super) fn for_operator() -> Self {
        if cfg!(feature="simd") {
            Self::detected()
        } else {
            Self::Reference
        }
    }

    /// Multiply with this kernel, if the CPU supports it
    pub(super) fn apply(self, lhs: &Rows, rhs: &Rows) -> Result<Rows, MatError> {
        if !self.is_available() {
            return Err(MatError::KernelUnavailable { kernel: self });
        }
        // SAFETY: availability checked above
        Ok(unsafe { self.apply_unchecked(lhs, rhs) })
    }

    /// Multiply without checking CPU support
    ///
    /// ## Safety
    /// [is_available](Self::is_available) must be true for `self`.
    #[inline]
    pub(super) unsafe fn apply_unchecked(self, lhs: &Rows, rhs: &Rows) -> Rows {
        match self {
            Self::Reference => reference::matmul(lhs, rhs),
            #[cfg(any(target_arch="x86", target_arch="x86_64"))]
            Self::Sse => x86::matmul_sse(lhs, rhs),
            #[cfg(any(target_arch="x86", target_arch="x86_64"))]
            Self::Avx => x86::matmul_avx(lhs, rhs),
            #[cfg(not(any(target_arch="x86", target_arch="x86_64")))]
            Self::Sse | Self::Avx => reference::matmul(lhs, rhs),
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::{ApproxEq, F32Margin};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{MatMulKernel, Rows};
    use crate::MatError;

    fn random_rows(rng: &mut StdRng) -> Rows {
        let mut rows = [[0f32; 3]; 3];
        for row in rows.iter_mut() {
            for e in row.iter_mut() {
                *e = rng.gen_range(-100f32..100f32);
            }
        }
        rows
    }

    #[test]
    fn reference_always_available() {
        assert!(MatMulKernel::Reference.is_available());
        assert_eq!(MatMulKernel::available().next(), Some(MatMulKernel::Reference));
    }

    #[test]
    fn detected_is_available() {
        let kernel = MatMulKernel::detected();
        assert!(kernel.is_available());
        assert_eq!(MatMulKernel::available().last(), Some(kernel));
    }

    #[test]
    fn kernels_match_reference() {
        let mut rng = StdRng::seed_from_u64(0x3a3);
        let margin = F32Margin { epsilon: 0., ulps: 2 };
        for _ in 0..256 {
            let a = random_rows(&mut rng);
            let b = random_rows(&mut rng);
            let expected = MatMulKernel::Reference.apply(&a, &b).unwrap();
            for kernel in MatMulKernel::available() {
                let actual = kernel.apply(&a, &b).unwrap();
                for i in 0..3 {
                    for j in 0..3 {
                        assert!(
                            actual[i][j].approx_eq(expected[i][j], margin),
                            "{kernel:?} mismatch at ({i}, {j}): {} vs {}", actual[i][j], expected[i][j]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn kernels_propagate_non_finite() {
        let a = [
            [f32::INFINITY, 0., 0.],
            [0., 1., 0.],
            [0., 0., f32::NAN],
        ];
        let b = [
            [1., 0., 0.],
            [0., 1., 0.],
            [0., 0., 1.],
        ];
        for kernel in MatMulKernel::available() {
            let c = kernel.apply(&a, &b).unwrap();
            assert_eq!(c[0][0], f32::INFINITY, "{kernel:?}");
            assert_eq!(c[1][1], 1., "{kernel:?}");
            assert!(c[2][2].is_nan(), "{kernel:?}");
        }
    }

    #[test]
    fn unavailable_kernel_is_an_error() {
        let a = [[1.; 3]; 3];
        for kernel in MatMulKernel::ALL {
            if !kernel.is_available() {
                assert_eq!(kernel.apply(&a, &a), Err(MatError::KernelUnavailable { kernel }));
            }
        }
    }
}
