//! Input validation for the least-squares entry points.
//!
//! Checks run cheapest first and stop at the first violation:
//!
//! 1. solver options
//! 2. response length vs. design rows
//! 3. every `X` entry finite
//! 4. every `y` entry finite
//!
//! Shape checks on `X` itself (non-empty, rectangular) happen when the
//! `DesignMatrix` is constructed.

use crate::domain::{DesignMatrix, SolveOptions};
use crate::error::OlsError;

/// Validate a design matrix / response pair before any arithmetic.
pub fn validate_inputs(x: &DesignMatrix, y: &[f64], opts: &SolveOptions) -> Result<(), OlsError> {
    opts.validate()?;

    if y.len() != x.nrows() {
        return Err(OlsError::LengthMismatch {
            what: "y",
            expected: x.nrows(),
            got: y.len(),
        });
    }

    ensure_finite(x.as_slice(), "X")?;
    ensure_finite(y, "y")
}

/// Fail with `NonFiniteInput` at the first NaN/Inf in `values`.
pub fn ensure_finite(values: &[f64], what: &'static str) -> Result<(), OlsError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OlsError::NonFiniteInput { what, index }),
        None => Ok(()),
    }
}
