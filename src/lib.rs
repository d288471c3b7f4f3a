//! `chol-ols` library crate.
//!
//! Ordinary least squares through the normal equations and a from-scratch
//! Cholesky solver:
//!
//! - `math`: packed triangular storage, the normal-equations builder, and
//!   the Cholesky factor with its forward/back substitutions
//! - `fit`: validated entry points (`solve_least_squares`, `fit_least_squares`,
//!   `cholesky_solve`)
//! - `domain`: input/config/output types
//! - `error`: the `OlsError` type
//!
//! ```
//! use chol_ols::{DesignMatrix, solve_least_squares};
//!
//! let x = DesignMatrix::from_rows(&[[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]]).unwrap();
//! let beta = solve_least_squares(&x, &[2.0, 3.0, 5.0]).unwrap();
//! assert!((beta[1] - 1.5).abs() < 1e-12);
//! ```

pub mod domain;
pub mod error;
pub mod fit;
#[cfg(feature = "nalgebra")]
pub mod interop;
pub mod math;

pub use domain::{DesignMatrix, LeastSquaresFit, SolveOptions};
pub use error::OlsError;
pub use fit::{cholesky_solve, fit_least_squares, solve_least_squares};
pub use math::{CholeskyFactor, NormalEquations, SymmetricMatrix, build_normal_equations};
