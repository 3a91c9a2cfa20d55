#[cfg(feature="cffi")]
pub(crate) mod c;
