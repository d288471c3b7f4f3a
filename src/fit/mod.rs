//! Least-squares orchestration.
//!
//! Responsibilities:
//!
//! - validate inputs before any arithmetic
//! - run the normal-equations builder and the Cholesky solver in sequence
//! - surface every failure as a typed `OlsError`

pub mod solver;
pub mod validation;

pub use solver::*;
pub use validation::*;
