//! Conversions from `nalgebra` types (feature `nalgebra`).

use nalgebra::{DMatrix, DVector};

use crate::domain::DesignMatrix;
use crate::error::OlsError;

impl TryFrom<&DMatrix<f64>> for DesignMatrix {
    type Error = OlsError;

    fn try_from(m: &DMatrix<f64>) -> Result<Self, Self::Error> {
        // nalgebra stores column-major.
        DesignMatrix::from_column_slice(m.nrows(), m.ncols(), m.as_slice())
    }
}

/// Solve with a nalgebra design matrix / response pair.
pub fn solve_dmatrix(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, OlsError> {
    let design = DesignMatrix::try_from(x)?;
    let beta = crate::fit::solve_least_squares(&design, y.as_slice())?;
    Ok(DVector::from_vec(beta))
}
