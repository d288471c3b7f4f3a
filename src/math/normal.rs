//! Normal-equations builder.
//!
//! Forms
//!
//! ```text
//! XtX[i][j] = Σ_k X[k][i] · X[k][j]
//! Xty[i]    = Σ_k X[k][i] · y[k]
//! ```
//!
//! Only the lower triangle of `XtX` is accumulated; `SymmetricMatrix` mirrors
//! it. Every cell starts at `0.0` and adds its terms for `k = 0, 1, .., n-1`
//! in that order, so results do not depend on whether the rows of the
//! triangle were computed on one thread or many.

use std::mem;

use log::debug;
use rayon::prelude::*;

use crate::domain::{DesignMatrix, SolveOptions};
use crate::error::OlsError;
use crate::math::packed::{SymmetricMatrix, packed_len};

/// `XᵗX` and `Xᵗy` for one design matrix / response pair.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalEquations {
    pub xtx: SymmetricMatrix,
    pub xty: Vec<f64>,
    /// Number of observations the sums ran over.
    pub n_obs: usize,
}

/// Build the normal equations for `x` and `y`.
///
/// Fails with `LengthMismatch` if `y.len() != x.nrows()`. Values are not
/// checked for finiteness here; see `fit::validation`.
pub fn build_normal_equations(
    x: &DesignMatrix,
    y: &[f64],
    opts: &SolveOptions,
) -> Result<NormalEquations, OlsError> {
    let n = x.nrows();
    let p = x.ncols();
    if y.len() != n {
        return Err(OlsError::LengthMismatch {
            what: "y",
            expected: n,
            got: y.len(),
        });
    }

    let work = n.saturating_mul(p).saturating_mul(p);
    let parallel = opts.parallel && work >= opts.parallel_min_work;
    debug!("building normal equations: n={n}, p={p}, parallel={parallel}");

    let mut xtx = SymmetricMatrix::zeros(p);
    {
        // Split the packed buffer into one mutable slice per triangle row.
        let mut rows: Vec<&mut [f64]> = Vec::with_capacity(p);
        let mut rest = xtx.as_packed_mut();
        for i in 0..p {
            let (head, tail) = mem::take(&mut rest).split_at_mut(i + 1);
            rows.push(head);
            rest = tail;
        }

        if parallel {
            rows.into_par_iter()
                .enumerate()
                .for_each(|(i, out)| accumulate_xtx_row(x, i, out));
        } else {
            for (i, out) in rows.into_iter().enumerate() {
                accumulate_xtx_row(x, i, out);
            }
        }
    }
    debug_assert_eq!(xtx.as_packed().len(), packed_len(p));

    let mut xty = vec![0.0; p];
    for (row, &yk) in x.rows().zip(y) {
        for (acc, &xki) in xty.iter_mut().zip(row) {
            *acc += xki * yk;
        }
    }

    Ok(NormalEquations { xtx, xty, n_obs: n })
}

/// Accumulate row `i` of the lower triangle: `out[j] = Σ_k X[k][i]·X[k][j]` for `j <= i`.
fn accumulate_xtx_row(x: &DesignMatrix, i: usize, out: &mut [f64]) {
    debug_assert_eq!(out.len(), i + 1);
    for row in x.rows() {
        let xki = row[i];
        for (acc, &xkj) in out.iter_mut().zip(&row[..=i]) {
            *acc += xki * xkj;
        }
    }
}
