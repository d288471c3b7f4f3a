//! Packed lower-triangular storage.
//!
//! Both the normal matrix and its Cholesky factor only need the lower triangle.
//! We store it row by row in a flat buffer of `dim * (dim + 1) / 2` entries:
//!
//! ```text
//! index(i, j) = i * (i + 1) / 2 + j      (j <= i)
//! ```
//!
//! Row `i` is contiguous (`index(i, 0) .. index(i, 0) + i + 1`), which is what
//! the Cholesky inner loops walk.

use crate::error::OlsError;

/// Number of stored entries for a `dim x dim` lower triangle.
#[inline]
pub fn packed_len(dim: usize) -> usize {
    dim * (dim + 1) / 2
}

/// Flat index of `(i, j)` with `j <= i`.
#[inline]
pub fn packed_index(i: usize, j: usize) -> usize {
    debug_assert!(j <= i, "packed_index expects j <= i, got ({i}, {j})");
    i * (i + 1) / 2 + j
}

/// Symmetric `dim x dim` matrix backed by its packed lower triangle.
///
/// `get(i, j)` and `get(j, i)` read the same stored value, so symmetry is exact.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricMatrix {
    dim: usize,
    lower: Vec<f64>,
}

impl SymmetricMatrix {
    /// All-zero matrix.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            lower: vec![0.0; packed_len(dim)],
        }
    }

    /// Wrap an already-packed lower triangle.
    pub fn from_packed(dim: usize, lower: Vec<f64>) -> Result<Self, OlsError> {
        if dim == 0 {
            return Err(OlsError::EmptyDesign { nrows: 0, ncols: 0 });
        }
        if lower.len() != packed_len(dim) {
            return Err(OlsError::ShapeMismatch {
                expected: packed_len(dim),
                got: lower.len(),
            });
        }
        Ok(Self { dim, lower })
    }

    /// Read a dense row-major `dim x dim` buffer.
    ///
    /// Only the lower triangle (`j <= i`) is read; the upper triangle is
    /// assumed to mirror it and is ignored.
    pub fn from_row_slice(dim: usize, data: &[f64]) -> Result<Self, OlsError> {
        if dim == 0 {
            return Err(OlsError::EmptyDesign { nrows: 0, ncols: 0 });
        }
        if data.len() != dim * dim {
            return Err(OlsError::ShapeMismatch {
                expected: dim * dim,
                got: data.len(),
            });
        }
        let mut lower = Vec::with_capacity(packed_len(dim));
        for i in 0..dim {
            lower.extend_from_slice(&data[i * dim..i * dim + i + 1]);
        }
        Ok(Self { dim, lower })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry `(i, j)`; either triangle may be addressed.
    ///
    /// # Panics
    /// Panics if `i` or `j` is `>= dim`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.dim && j < self.dim, "({i}, {j}) out of range for dim {}", self.dim);
        let (r, c) = if j <= i { (i, j) } else { (j, i) };
        self.lower[packed_index(r, c)]
    }

    /// Stored lower-triangle row `i`: entries `(i, 0..=i)`.
    #[inline]
    pub fn lower_row(&self, i: usize) -> &[f64] {
        let start = packed_index(i, 0);
        &self.lower[start..start + i + 1]
    }

    /// The packed lower triangle.
    pub fn as_packed(&self) -> &[f64] {
        &self.lower
    }

    pub(crate) fn as_packed_mut(&mut self) -> &mut [f64] {
        &mut self.lower
    }

    /// Expand to a dense row-major `dim x dim` buffer.
    pub fn to_row_major(&self) -> Vec<f64> {
        let n = self.dim;
        let mut out = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..=i {
                let v = self.lower[packed_index(i, j)];
                out[i * n + j] = v;
                out[j * n + i] = v;
            }
        }
        out
    }

    /// Largest `|self[i][j] - other[i][j]|`, or `None` if the dimensions differ.
    pub fn max_abs_diff(&self, other: &SymmetricMatrix) -> Option<f64> {
        if self.dim != other.dim {
            return None;
        }
        Some(
            self.lower
                .iter()
                .zip(&other.lower)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }
}
