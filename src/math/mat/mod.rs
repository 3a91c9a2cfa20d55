mod mat33;
mod error;
/// Matrix multiplication kernels
mod mul;


pub use mat33::Mat33;
pub use error::MatError;
pub use mul::MatMulKernel;
