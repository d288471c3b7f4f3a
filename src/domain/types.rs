//! Shared domain types.
//!
//! This module defines:
//!
//! - the validated design matrix (`DesignMatrix`)
//! - solver configuration (`SolveOptions`)
//! - the fit output (`LeastSquaresFit`)

use serde::{Deserialize, Serialize};

use crate::error::OlsError;
use crate::math::check_pivot_tolerance;

/// Default relative pivot tolerance used by the Cholesky step.
///
/// A diagonal pivot must exceed `tolerance * |A[i][i]|`. Exactly collinear
/// columns leave a residue of a few ulps, far below this.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-10;

/// Minimum `n * p * p` before the normal-equations builder fans out to rayon.
pub const DEFAULT_PARALLEL_MIN_WORK: usize = 1 << 16;

/// Dense design matrix `X` with `nrows` observations and `ncols` predictors.
///
/// Storage is row-major: observation `k` occupies
/// `data[k * ncols .. (k + 1) * ncols]`. Construction rejects zero-sized
/// shapes and buffers whose length disagrees with the shape, so every
/// `DesignMatrix` in circulation is at least 1x1.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl DesignMatrix {
    /// Take ownership of a row-major buffer.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<f64>) -> Result<Self, OlsError> {
        if nrows == 0 || ncols == 0 {
            return Err(OlsError::EmptyDesign { nrows, ncols });
        }
        let expected = nrows.checked_mul(ncols).ok_or(OlsError::ShapeMismatch {
            expected: usize::MAX,
            got: data.len(),
        })?;
        if data.len() != expected {
            return Err(OlsError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { nrows, ncols, data })
    }

    /// Copy a row-major slice (same convention as `nalgebra::DMatrix::from_row_slice`).
    pub fn from_row_slice(nrows: usize, ncols: usize, data: &[f64]) -> Result<Self, OlsError> {
        Self::from_vec(nrows, ncols, data.to_vec())
    }

    /// Copy a column-major slice, transposing into row-major storage.
    pub fn from_column_slice(nrows: usize, ncols: usize, data: &[f64]) -> Result<Self, OlsError> {
        if nrows == 0 || ncols == 0 {
            return Err(OlsError::EmptyDesign { nrows, ncols });
        }
        let expected = nrows.checked_mul(ncols).ok_or(OlsError::ShapeMismatch {
            expected: usize::MAX,
            got: data.len(),
        })?;
        if data.len() != expected {
            return Err(OlsError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        let mut out = vec![0.0; expected];
        for col in 0..ncols {
            for row in 0..nrows {
                out[row * ncols + col] = data[col * nrows + row];
            }
        }
        Ok(Self {
            nrows,
            ncols,
            data: out,
        })
    }

    /// Build from a list of observation rows. Every row must have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, OlsError> {
        let nrows = rows.len();
        let ncols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if nrows == 0 || ncols == 0 {
            return Err(OlsError::EmptyDesign { nrows, ncols });
        }

        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(OlsError::ShapeMismatch {
                    expected: ncols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(nrows, ncols, data)
    }

    /// Number of observations (`n`).
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of predictors (`p`).
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Observation `k` as a slice of length `ncols`.
    ///
    /// # Panics
    /// Panics if `k >= nrows`.
    #[inline]
    pub fn row(&self, k: usize) -> &[f64] {
        let start = k * self.ncols;
        &self.data[start..start + self.ncols]
    }

    /// Iterate over observation rows in index order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.ncols)
    }

    /// Entry `X[row][col]`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(col < self.ncols, "column {col} out of range for {} columns", self.ncols);
        self.data[row * self.ncols + col]
    }

    /// The row-major backing buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Return a copy with a leading column of ones (intercept term).
    pub fn with_intercept(&self) -> Self {
        let ncols = self.ncols + 1;
        let mut data = Vec::with_capacity(self.nrows * ncols);
        for row in self.rows() {
            data.push(1.0);
            data.extend_from_slice(row);
        }
        Self {
            nrows: self.nrows,
            ncols,
            data,
        }
    }

    /// Fitted values `X·β`.
    pub fn predict(&self, beta: &[f64]) -> Result<Vec<f64>, OlsError> {
        if beta.len() != self.ncols {
            return Err(OlsError::LengthMismatch {
                what: "beta",
                expected: self.ncols,
                got: beta.len(),
            });
        }
        Ok(self
            .rows()
            .map(|row| row.iter().zip(beta).map(|(x, b)| x * b).sum())
            .collect())
    }
}

/// Solver configuration.
///
/// All fields have sensible defaults; deserialising a partial document fills
/// in the rest from `SolveOptions::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Relative threshold for Cholesky pivots.
    ///
    /// Factorization fails with `NotPositiveDefinite` unless every pivot
    /// `A[i][i] - Σ L[i][k]²` is strictly greater than
    /// `pivot_tolerance * |A[i][i]|`. `0.0` reduces this to the bare
    /// "pivot must be positive" rule.
    pub pivot_tolerance: f64,

    /// Allow the normal-equations builder to use the rayon pool.
    ///
    /// Results are bit-identical either way; this only affects wall time.
    pub parallel: bool,

    /// Work threshold (`n * p * p`) below which the builder stays sequential.
    pub parallel_min_work: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            parallel: true,
            parallel_min_work: DEFAULT_PARALLEL_MIN_WORK,
        }
    }
}

impl SolveOptions {
    /// Defaults, but never parallel.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Defaults, but only reject pivots that are `<= 0` (or NaN).
    pub fn strict_positive_pivot() -> Self {
        Self {
            pivot_tolerance: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), OlsError> {
        check_pivot_tolerance(self.pivot_tolerance)
    }
}

/// Output of a least-squares fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeastSquaresFit {
    /// `β`, one entry per design-matrix column.
    pub coefficients: Vec<f64>,
    pub n_obs: usize,
    pub n_params: usize,
}
