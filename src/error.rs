//! Error type shared by every fallible operation in the crate.
//!
//! Every failure is terminal for the call that raised it: there are no partial
//! results, and a coefficient vector containing NaN/Inf is never returned.

/// All errors returned by `chol-ols`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OlsError {
    /// The design matrix has no rows or no columns.
    #[error("invalid input dimensions: design matrix is {nrows}x{ncols} (need at least 1x1)")]
    EmptyDesign { nrows: usize, ncols: usize },

    /// A flat buffer (or a set of rows) does not describe the requested shape.
    #[error("invalid input dimensions: expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// A vector's length disagrees with the matrix it is paired with.
    #[error("invalid input dimensions: `{what}` has length {got}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// NaN or infinity in the inputs.
    #[error("non-finite value in `{what}` at flat index {index}")]
    NonFiniteInput { what: &'static str, index: usize },

    /// The normal matrix is not positive-definite.
    ///
    /// In practice: collinear predictors, a zero column, or more predictors
    /// than observations.
    #[error(
        "singular or near-singular design matrix: \
         Cholesky pivot {pivot:e} at column {column} is not positive"
    )]
    NotPositiveDefinite { column: usize, pivot: f64 },

    /// A coefficient overflowed even though every input was finite.
    #[error("non-finite coefficient at index {index}")]
    NonFiniteCoefficient { index: usize },

    /// A `SolveOptions` field is out of range.
    #[error("invalid solver option: {reason}")]
    InvalidOption { reason: String },
}

impl OlsError {
    /// `true` for the rank-deficiency case (`NotPositiveDefinite`).
    pub fn is_singular(&self) -> bool {
        matches!(self, OlsError::NotPositiveDefinite { .. })
    }

    /// `true` for errors caused by malformed input shapes or values, i.e.
    /// anything rejected before arithmetic begins.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            OlsError::EmptyDesign { .. }
                | OlsError::ShapeMismatch { .. }
                | OlsError::LengthMismatch { .. }
                | OlsError::NonFiniteInput { .. }
        )
    }
}
