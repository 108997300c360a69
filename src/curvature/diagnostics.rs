//! curvature::diagnostics — spectral summaries of a Fisher matrix.
//!
//! Thin reduction of an estimated Fisher matrix to the three scalars used
//! for convergence monitoring: condition number, trace, and the largest
//! eigenvalue. All three come from one symmetric eigendecomposition on the
//! `nalgebra` side of the bridge; nothing here mutates the matrix.
use crate::{
    curvature::{errors::CurvatureResult, natural::fill_dmatrix, validation::validate_fisher},
    types::FisherMatrix,
};
use nalgebra::DMatrix;

/// Spectral summary of an estimated Fisher matrix.
///
/// - `condition_number`: ratio of the largest to the smallest absolute
///   eigenvalue; `+∞` when the smallest is exactly zero (rank-deficient or
///   all-zero estimate).
/// - `trace`: sum of the diagonal, a cheap overall curvature scale.
/// - `max_eigenvalue`: largest eigenvalue, the stiffest curvature
///   direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisherDiagnostics {
    pub condition_number: f64,
    pub trace: f64,
    pub max_eigenvalue: f64,
}

impl FisherDiagnostics {
    /// Reduce a Fisher matrix to its spectral summary.
    ///
    /// # Errors
    /// Propagates validation errors for a non-square or non-finite matrix.
    pub fn from_fisher(fisher: &FisherMatrix) -> CurvatureResult<Self> {
        let n = fisher.nrows();
        validate_fisher(fisher, n)?;

        let mut dense = DMatrix::<f64>::zeros(n, n);
        fill_dmatrix(fisher, &mut dense);
        let eigenvalues = dense.symmetric_eigen().eigenvalues;

        let max_eigenvalue = eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let max_abs = eigenvalues.iter().map(|l| l.abs()).fold(0.0_f64, f64::max);
        let min_abs = eigenvalues.iter().map(|l| l.abs()).fold(f64::INFINITY, f64::min);
        let condition_number = if min_abs == 0.0 { f64::INFINITY } else { max_abs / min_abs };

        Ok(Self { condition_number, trace: fisher.diag().sum(), max_eigenvalue })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact diagnostics for a diagonal matrix with known spectrum.
    // - The infinite condition number of a rank-deficient matrix.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify all three diagnostics on a diagonal matrix whose spectrum is
    // read directly off the diagonal.
    //
    // Given
    // -----
    // - `F = diag(4, 1)`.
    //
    // Expect
    // ------
    // - Condition number 4, trace 5, largest eigenvalue 4.
    fn diagonal_matrix_reports_exact_spectrum() {
        // Arrange
        let fisher = array![[4.0, 0.0], [0.0, 1.0]];

        // Act
        let diag = FisherDiagnostics::from_fisher(&fisher).expect("valid matrix");

        // Assert
        assert!((diag.condition_number - 4.0).abs() < 1e-10);
        assert!((diag.trace - 5.0).abs() < 1e-12);
        assert!((diag.max_eigenvalue - 4.0).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Check that a rank-deficient matrix reports an infinite condition
    // number rather than dividing by zero.
    //
    // Given
    // -----
    // - `F = diag(1, 0)`.
    //
    // Expect
    // ------
    // - `condition_number == +∞`, trace 1, largest eigenvalue 1.
    fn rank_deficient_matrix_reports_infinite_condition_number() {
        // Arrange
        let fisher = array![[1.0, 0.0], [0.0, 0.0]];

        // Act
        let diag = FisherDiagnostics::from_fisher(&fisher).expect("valid matrix");

        // Assert
        assert!(diag.condition_number.is_infinite());
        assert!((diag.trace - 1.0).abs() < 1e-12);
        assert!((diag.max_eigenvalue - 1.0).abs() < 1e-10);
    }
}
