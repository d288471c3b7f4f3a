//! Domain types used throughout the solver.
//!
//! This module defines:
//!
//! - the validated input matrix (`DesignMatrix`)
//! - configuration (`SolveOptions`)
//! - fit outputs (`LeastSquaresFit`)

pub mod types;

pub use types::*;
