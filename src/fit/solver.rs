//! Least-squares entry points.
//!
//! Given a design matrix `X` (n×p) and response `y` (length n) we:
//!
//! 1. validate shapes and values
//! 2. build the normal equations `XᵗX·β = Xᵗy`
//! 3. factor `XᵗX = L·Lᵗ`
//! 4. solve `L·z = Xᵗy`, then `Lᵗ·β = z`
//!
//! and return `β`, or the first error encountered. Each call owns all of its
//! intermediate buffers.

use std::time::Instant;

use log::{debug, trace};

use crate::domain::{DesignMatrix, LeastSquaresFit, SolveOptions};
use crate::error::OlsError;
use crate::fit::validation::{ensure_finite, validate_inputs};
use crate::math::{CholeskyFactor, SymmetricMatrix, build_normal_equations};

/// Solve an ordinary least-squares problem with default options.
///
/// Returns the coefficient vector `β` (length `x.ncols()`).
pub fn solve_least_squares(x: &DesignMatrix, y: &[f64]) -> Result<Vec<f64>, OlsError> {
    fit_least_squares(x, y, &SolveOptions::default()).map(|fit| fit.coefficients)
}

/// Solve an ordinary least-squares problem with explicit options.
pub fn fit_least_squares(
    x: &DesignMatrix,
    y: &[f64],
    opts: &SolveOptions,
) -> Result<LeastSquaresFit, OlsError> {
    let started = Instant::now();
    validate_inputs(x, y, opts)?;

    let normal = build_normal_equations(x, y, opts)?;
    trace!("normal equations built in {:?}", started.elapsed());
    // Finite inputs can still overflow once squared and summed.
    ensure_finite(normal.xtx.as_packed(), "XtX")?;
    ensure_finite(&normal.xty, "Xty")?;

    let coefficients = solve_normal_system(&normal.xtx, &normal.xty, opts)?;
    trace!("least-squares solve finished in {:?}", started.elapsed());

    Ok(LeastSquaresFit {
        coefficients,
        n_obs: normal.n_obs,
        n_params: x.ncols(),
    })
}

/// Solve a pre-assembled normal system `xtx·β = xty`.
///
/// Useful when `XᵗX` / `Xᵗy` were accumulated elsewhere (for example
/// streamed in chunks). Only the lower triangle of `xtx` is consulted.
pub fn cholesky_solve(
    xtx: &SymmetricMatrix,
    xty: &[f64],
    opts: &SolveOptions,
) -> Result<Vec<f64>, OlsError> {
    opts.validate()?;
    if xtx.dim() == 0 {
        return Err(OlsError::EmptyDesign { nrows: 0, ncols: 0 });
    }
    if xty.len() != xtx.dim() {
        return Err(OlsError::LengthMismatch {
            what: "xty",
            expected: xtx.dim(),
            got: xty.len(),
        });
    }
    ensure_finite(xtx.as_packed(), "XtX")?;
    ensure_finite(xty, "Xty")?;

    solve_normal_system(xtx, xty, opts)
}

fn solve_normal_system(
    xtx: &SymmetricMatrix,
    xty: &[f64],
    opts: &SolveOptions,
) -> Result<Vec<f64>, OlsError> {
    let factor = CholeskyFactor::decompose(xtx, opts.pivot_tolerance)?;
    let beta = factor.solve(xty)?;
    debug!("solved {} coefficients", beta.len());
    Ok(beta)
}
