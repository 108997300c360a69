//! curvature::natural — damped natural-gradient solve.
//!
//! Purpose
//! -------
//! Convert an ordinary gradient into the curvature-corrected ("natural")
//! direction by solving the damped linear system `(F + damping·I)·x = g`.
//! This module owns the `ndarray` → `nalgebra` bridge and the factorization
//! strategy; callers hand it a Fisher matrix and a gradient and get back
//! the steepest-ascent direction under the curvature metric.
//!
//! Key behaviors
//! -------------
//! - Copy the Fisher matrix into a `nalgebra::DMatrix` (`fill_dmatrix`) and
//!   add `damping` to the diagonal.
//! - Factorize with Cholesky first — the damped matrix is positive
//!   definite whenever the Fisher matrix is positive semi-definite, since
//!   its minimum eigenvalue is at least `damping` — and fall back to LU
//!   when measurement noise has pushed the matrix indefinite.
//! - Fail with [`CurvatureError::SingularSystem`] when both factorizations
//!   reject the matrix; this is fatal for the step and never retried here,
//!   because retrying the same inputs cannot succeed.
//!
//! Invariants & assumptions
//! ------------------------
//! - The input matrix is square, finite, and symmetric up to roundoff;
//!   asymmetry indicates an estimator bug and is guarded by a debug
//!   assertion, not a user-facing error.
//! - `damping > 0` is validated on entry; a zero or negative damping would
//!   void the invertibility guarantee.
//!
//! Conventions
//! -----------
//! - No explicit matrix inverse is formed; both paths solve in place from
//!   a factorization.
//! - Errors are reported via [`CurvatureResult<T>`].
//!
//! Testing notes
//! -------------
//! - Unit tests check the residual `‖(F + damping·I)·x − g‖` on a PSD
//!   matrix, the `g / damping` degenerate case for a zero matrix, the
//!   damping validation, and the singular failure path.
use crate::{
    curvature::{
        errors::{CurvatureError, CurvatureResult},
        validation::{validate_fisher, validate_grad, verify_damping},
    },
    types::{FisherMatrix, Grad},
};
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;

/// solve_natural_gradient — damped linear solve for the natural gradient.
///
/// Purpose
/// -------
/// Solve `(fisher + damping·I)·x = grad` for `x`, the steepest-ascent
/// direction under the curvature metric defined by `fisher`.
///
/// Parameters
/// ----------
/// - `fisher`: `&FisherMatrix`
///   Symmetric curvature matrix, typically produced by
///   [`FisherEstimator::compute`](crate::curvature::FisherEstimator::compute).
///   Positive semi-definiteness is expected but not required; the damping
///   absorbs small negative eigenvalues introduced by noise.
/// - `grad`: `&Grad`
///   Ordinary gradient; length must match the matrix dimension.
/// - `damping`: `f64`
///   Diagonal regularization; must be finite and strictly positive.
///   [`DEFAULT_DAMPING`](crate::types::DEFAULT_DAMPING) is the
///   conventional choice.
///
/// Returns
/// -------
/// `CurvatureResult<Grad>`
///   The natural gradient `x` with the same length as `grad`.
///
/// Errors
/// ------
/// - [`CurvatureError::NonPositiveDamping`] for an invalid damping.
/// - [`CurvatureError::ParamsDimMismatch`] / `NonFiniteFisher` for an
///   invalid matrix.
/// - [`CurvatureError::GradientDimMismatch`] / `NonFiniteGradient` for an
///   invalid gradient.
/// - [`CurvatureError::SingularSystem`] when the damped matrix cannot be
///   factorized; fatal for the step, surfaced to the caller, never
///   silently retried with the same damping.
///
/// Panics
/// ------
/// - Debug builds assert symmetry of `fisher` (estimator invariant).
///
/// Notes
/// -----
/// - Cholesky is attempted first; an indefinite matrix (noise-dominated
///   estimate) falls back to LU, which tolerates any invertible matrix.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use hybrid_natgrad::curvature::solve_natural_gradient;
/// let fisher = array![[2.0, 0.0], [0.0, 1.0]];
/// let grad = array![1.0, 1.0];
///
/// let natural = solve_natural_gradient(&fisher, &grad, 1e-4).unwrap();
/// assert!((natural[0] - 1.0 / 2.0001).abs() < 1e-9);
/// assert!((natural[1] - 1.0 / 1.0001).abs() < 1e-9);
/// ```
pub fn solve_natural_gradient(
    fisher: &FisherMatrix, grad: &Grad, damping: f64,
) -> CurvatureResult<Grad> {
    verify_damping(damping)?;
    let n = fisher.nrows();
    validate_fisher(fisher, n)?;
    validate_grad(grad, n)?;
    debug_assert!(
        max_asymmetry(fisher) < 1e-8,
        "Fisher matrix handed to the solver is asymmetric"
    );

    let mut damped = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(fisher, &mut damped);
    for i in 0..n {
        damped[(i, i)] += damping;
    }
    let rhs = DVector::from_iterator(n, grad.iter().copied());

    let solution = match damped.clone().cholesky() {
        Some(factorization) => factorization.solve(&rhs),
        None => damped
            .lu()
            .solve(&rhs)
            .ok_or(CurvatureError::SingularSystem { damping })?,
    };
    Ok(Array1::from_iter(solution.iter().copied()))
}

// ---- Helper methods ----

/// Copy an `ndarray` matrix into a preallocated `nalgebra::DMatrix` using
/// column-major writes. Symmetry is neither checked nor altered here.
pub(crate) fn fill_dmatrix(fisher: &FisherMatrix, target: &mut DMatrix<f64>) {
    let n = fisher.ncols();
    for j in 0..n {
        for i in j..n {
            if j == i {
                target[(i, i)] = fisher[[i, i]];
            } else {
                target[(i, j)] = fisher[[i, j]];
                target[(j, i)] = fisher[[j, i]];
            }
        }
    }
}

/// Largest absolute off-diagonal asymmetry, used by the debug assertion.
fn max_asymmetry(fisher: &FisherMatrix) -> f64 {
    let n = fisher.nrows();
    let mut worst = 0.0_f64;
    for i in 0..n {
        for j in 0..i {
            worst = worst.max((fisher[[i, j]] - fisher[[j, i]]).abs());
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Residual accuracy of the damped solve on a PSD matrix.
    // - The `grad / damping` degenerate case for a zero Fisher matrix.
    // - Damping validation and the singular failure path.
    // - The ndarray → nalgebra copy helper.
    //
    // They intentionally DO NOT cover:
    // - Estimation of the Fisher matrix itself (estimator tests own that).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the solution satisfies the damped system to numerical
    // tolerance on a well-conditioned PSD matrix.
    //
    // Given
    // -----
    // - A 2×2 symmetric PSD matrix, damping 1e-4, and a fixed gradient.
    //
    // Expect
    // ------
    // - `‖(F + damping·I)·x − g‖ < 1e-10`.
    fn solve_residual_is_small_for_psd_matrix() {
        // Arrange
        let fisher = array![[2.0, 0.3], [0.3, 1.0]];
        let grad = array![1.0, -2.0];
        let damping = 1e-4;

        // Act
        let x = solve_natural_gradient(&fisher, &grad, damping).expect("solve succeeds");

        // Assert
        let damped = &fisher + &(FisherMatrix::eye(2) * damping);
        let residual = damped.dot(&x) - &grad;
        let norm = residual.dot(&residual).sqrt();
        assert!(norm < 1e-10, "residual norm {norm} too large");
    }

    #[test]
    // Purpose
    // -------
    // Check that a zero Fisher matrix degenerates to `damping·I·x = g`,
    // i.e. `x = g / damping`.
    //
    // Given
    // -----
    // - The 2×2 zero matrix, damping 1e-4, nonzero gradient.
    //
    // Expect
    // ------
    // - Each solution entry equals the gradient entry divided by 1e-4.
    fn zero_fisher_returns_grad_over_damping() {
        // Arrange
        let fisher = FisherMatrix::zeros((2, 2));
        let grad = array![0.5, -0.25];
        let damping = 1e-4;

        // Act
        let x = solve_natural_gradient(&fisher, &grad, damping).expect("solve succeeds");

        // Assert
        for (xi, gi) in x.iter().zip(grad.iter()) {
            let expected = gi / damping;
            assert!((xi - expected).abs() < 1e-6 * expected.abs().max(1.0));
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure invalid damping is rejected before any factorization.
    //
    // Given
    // -----
    // - Zero and negative damping values.
    //
    // Expect
    // ------
    // - `NonPositiveDamping` for both.
    fn non_positive_damping_is_rejected() {
        // Arrange
        let fisher = FisherMatrix::eye(2);
        let grad = array![1.0, 1.0];

        // Act / Assert
        for bad in [0.0, -1e-4] {
            match solve_natural_gradient(&fisher, &grad, bad) {
                Err(CurvatureError::NonPositiveDamping { .. }) => {}
                other => panic!("Expected NonPositiveDamping for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Exercise the singular failure path: a matrix whose damped form is
    // exactly zero defeats both factorizations.
    //
    // Given
    // -----
    // - `F = diag(-d, -d)` with damping `d`, so `F + d·I = 0`.
    //
    // Expect
    // ------
    // - `Err(SingularSystem { .. })`.
    fn exactly_singular_damped_system_fails() {
        // Arrange
        let damping = 1e-4;
        let fisher = array![[-damping, 0.0], [0.0, -damping]];
        let grad = array![1.0, 1.0];

        // Act
        let result = solve_natural_gradient(&fisher, &grad, damping);

        // Assert
        match result {
            Err(CurvatureError::SingularSystem { .. }) => {}
            other => panic!("Expected SingularSystem, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `fill_dmatrix` copies entries without altering values or
    // symmetry.
    //
    // Given
    // -----
    // - A small 2×2 symmetric matrix with distinct entries.
    //
    // Expect
    // ------
    // - The corresponding `DMatrix` has identical entries everywhere.
    fn fill_dmatrix_copies_entries_exactly() {
        // Arrange
        let fisher = array![[2.0, 0.5], [0.5, 1.0]];
        let mut target = DMatrix::<f64>::zeros(2, 2);

        // Act
        fill_dmatrix(&fisher, &mut target);

        // Assert
        assert_eq!(target[(0, 0)], 2.0);
        assert_eq!(target[(0, 1)], 0.5);
        assert_eq!(target[(1, 0)], 0.5);
        assert_eq!(target[(1, 1)], 1.0);
    }
}
