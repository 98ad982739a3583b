//! Linear algebra utilities.
//!
//! Checks and products on dense symmetric matrices, the shape every
//! covariance matrix in this library takes.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Computes `xᵀ M x`.
///
/// Dimensions are checked by the caller; a mismatch panics inside nalgebra.
pub fn quadratic_form(matrix: &DMatrix<f64>, x: &DVector<f64>) -> f64 {
    x.dot(&(matrix * x))
}

/// Verifies that `matrix` is square.
pub fn check_square(matrix: &DMatrix<f64>) -> MathResult<()> {
    if matrix.nrows() != matrix.ncols() {
        return Err(MathError::invalid_input(format!(
            "Matrix must be square, got {}x{}",
            matrix.nrows(),
            matrix.ncols()
        )));
    }
    Ok(())
}

/// Largest absolute entry, or `1.0` for an all-zero matrix.
fn magnitude(matrix: &DMatrix<f64>) -> f64 {
    let largest = matrix.amax();
    if largest > 0.0 {
        largest
    } else {
        1.0
    }
}

/// Verifies that `matrix` is square and symmetric.
///
/// Entries are compared with a tolerance scaled by the largest absolute entry,
/// so covariance matrices of any magnitude are treated alike.
pub fn check_symmetric(matrix: &DMatrix<f64>, tolerance: f64) -> MathResult<()> {
    check_square(matrix)?;

    let scale = magnitude(matrix);
    let n = matrix.nrows();
    for i in 0..n {
        for j in i + 1..n {
            let deviation = (matrix[(i, j)] - matrix[(j, i)]).abs();
            if deviation > tolerance * scale {
                return Err(MathError::NotSymmetric {
                    row: i,
                    col: j,
                    deviation,
                });
            }
        }
    }
    Ok(())
}

/// Returns the smallest eigenvalue of a symmetric matrix.
///
/// An empty matrix has no spectrum; `0.0` is returned.
pub fn min_eigenvalue(matrix: &DMatrix<f64>) -> f64 {
    if matrix.is_empty() {
        return 0.0;
    }
    matrix.clone().symmetric_eigen().eigenvalues.min()
}

/// Verifies that a symmetric matrix is positive semidefinite.
///
/// Eigenvalues down to `-tolerance * max|m_ij|` are accepted as round-off
/// around zero.
pub fn check_positive_semidefinite(matrix: &DMatrix<f64>, tolerance: f64) -> MathResult<()> {
    check_symmetric(matrix, tolerance)?;

    let smallest = min_eigenvalue(matrix);
    if smallest < -tolerance * magnitude(matrix) {
        return Err(MathError::NotPositiveSemidefinite {
            min_eigenvalue: smallest,
        });
    }
    Ok(())
}
