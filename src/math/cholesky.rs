//! Cholesky factorization and triangular solves.
//!
//! Factors a symmetric positive-definite `A` as `A = L·Lᵗ` (Cholesky–Banachiewicz,
//! row by row), then solves `A·x = b` as
//!
//! - forward substitution: `L·z = b`
//! - back substitution:    `Lᵗ·x = z`, reading `L` transposed
//!
//! No pivoting and no refinement: this is a direct method for full-rank,
//! reasonably conditioned systems. Rank deficiency is detected at the pivot
//! and reported, never repaired.

use log::{debug, warn};

use crate::error::OlsError;
use crate::math::packed::{SymmetricMatrix, packed_index, packed_len};

/// Reject a pivot tolerance that is negative, NaN or infinite.
///
/// A negative tolerance would admit negative pivots and put NaN on the diagonal.
pub fn check_pivot_tolerance(pivot_tolerance: f64) -> Result<(), OlsError> {
    if pivot_tolerance.is_finite() && pivot_tolerance >= 0.0 {
        return Ok(());
    }
    Err(OlsError::InvalidOption {
        reason: format!("pivot_tolerance must be finite and >= 0, got {pivot_tolerance}"),
    })
}

/// Lower-triangular Cholesky factor, packed row by row.
///
/// Every diagonal entry is strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyFactor {
    dim: usize,
    l: Vec<f64>,
}

impl CholeskyFactor {
    /// Factor `a` into `L·Lᵗ`.
    ///
    /// For `i` in `0..p`, and `j` in `0..=i`:
    ///
    /// ```text
    /// sum     = Σ_{k<j} L[i][k]·L[j][k]
    /// L[i][i] = sqrt(A[i][i] - sum)
    /// L[i][j] = (A[i][j] - sum) / L[j][j]      (j < i)
    /// ```
    ///
    /// A diagonal pivot `A[i][i] - sum` must be strictly greater than
    /// `pivot_tolerance * |A[i][i]|`; otherwise (including NaN) this returns
    /// `NotPositiveDefinite` naming the failing column. A negative or
    /// non-finite `pivot_tolerance` is rejected with `InvalidOption`.
    pub fn decompose(a: &SymmetricMatrix, pivot_tolerance: f64) -> Result<Self, OlsError> {
        check_pivot_tolerance(pivot_tolerance)?;
        let p = a.dim();
        let mut l = vec![0.0; packed_len(p)];

        for i in 0..p {
            let row_i = packed_index(i, 0);
            let a_row = a.lower_row(i);
            for j in 0..=i {
                let row_j = packed_index(j, 0);
                let mut sum = 0.0;
                for k in 0..j {
                    sum += l[row_i + k] * l[row_j + k];
                }

                if i == j {
                    let pivot = a_row[i] - sum;
                    if !(pivot > pivot_tolerance * a_row[i].abs()) {
                        warn!(
                            "matrix is not positive-definite: pivot {pivot:e} at column {i} \
                             (diagonal {:e})",
                            a_row[i]
                        );
                        return Err(OlsError::NotPositiveDefinite { column: i, pivot });
                    }
                    l[row_i + i] = pivot.sqrt();
                } else {
                    l[row_i + j] = (a_row[j] - sum) / l[row_j + j];
                }
            }
        }

        debug!("cholesky factorization succeeded for p={p}");
        Ok(Self { dim: p, l })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry `L[i][j]`; `0.0` above the diagonal.
    ///
    /// # Panics
    /// Panics if `i` or `j` is `>= dim`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.dim && j < self.dim, "({i}, {j}) out of range for dim {}", self.dim);
        if j > i { 0.0 } else { self.l[packed_index(i, j)] }
    }

    /// `[L[0][0], L[1][1], ..]`.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.dim).map(|i| self.l[packed_index(i, i)]).collect()
    }

    /// The packed lower triangle.
    pub fn as_packed(&self) -> &[f64] {
        &self.l
    }

    /// Solve `L·z = b`.
    ///
    /// # Panics
    /// Panics if `b.len() != dim`. Use `solve` for a checked entry point.
    pub fn forward_substitute(&self, b: &[f64]) -> Vec<f64> {
        assert_eq!(b.len(), self.dim, "rhs length must match factor dimension");
        let mut z = vec![0.0; self.dim];
        for i in 0..self.dim {
            let row = &self.l[packed_index(i, 0)..packed_index(i, 0) + i + 1];
            let mut sum = 0.0;
            for j in 0..i {
                sum += row[j] * z[j];
            }
            z[i] = (b[i] - sum) / row[i];
        }
        z
    }

    /// Solve `Lᵗ·x = z` using the stored lower factor (`Lᵗ[i][j] = L[j][i]`).
    ///
    /// # Panics
    /// Panics if `z.len() != dim`.
    pub fn back_substitute(&self, z: &[f64]) -> Vec<f64> {
        assert_eq!(z.len(), self.dim, "rhs length must match factor dimension");
        let p = self.dim;
        let mut x = vec![0.0; p];
        for i in (0..p).rev() {
            let mut sum = 0.0;
            for j in (i + 1)..p {
                sum += self.l[packed_index(j, i)] * x[j];
            }
            x[i] = (z[i] - sum) / self.l[packed_index(i, i)];
        }
        x
    }

    /// Solve `A·x = b` where `A = L·Lᵗ`.
    ///
    /// Fails with `LengthMismatch` on a wrong-sized `b`, and with
    /// `NonFiniteCoefficient` if the solution overflows.
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>, OlsError> {
        if b.len() != self.dim {
            return Err(OlsError::LengthMismatch {
                what: "rhs",
                expected: self.dim,
                got: b.len(),
            });
        }
        let z = self.forward_substitute(b);
        let x = self.back_substitute(&z);
        if let Some(index) = x.iter().position(|v| !v.is_finite()) {
            return Err(OlsError::NonFiniteCoefficient { index });
        }
        Ok(x)
    }

    /// Rebuild `L·Lᵗ`.
    pub fn reconstruct(&self) -> SymmetricMatrix {
        let p = self.dim;
        let mut out = SymmetricMatrix::zeros(p);
        let packed = out.as_packed_mut();
        for i in 0..p {
            let row_i = packed_index(i, 0);
            for j in 0..=i {
                let row_j = packed_index(j, 0);
                let mut sum = 0.0;
                for k in 0..=j {
                    sum += self.l[row_i + k] * self.l[row_j + k];
                }
                packed[row_i + j] = sum;
            }
        }
        out
    }
}
