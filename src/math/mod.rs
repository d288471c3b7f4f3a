//! Dense linear-algebra kernel: packed storage, normal equations, Cholesky.

pub mod cholesky;
pub mod normal;
pub mod packed;

pub use cholesky::*;
pub use normal::*;
pub use packed::*;
