use thiserror::Error;

use super::MatMulKernel;

/// Error generated by fallible [Mat33](super::Mat33) operations
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MatError {
    #[error("Wrong number of matrix entries (actual: {actual}, expected: {expected})")]
    WrongLength {
        actual: usize,
        expected: usize,
    },
    #[error("Multiplication kernel {kernel:?} is not supported on this CPU")]
    KernelUnavailable {
        kernel: MatMulKernel,
    },
}
