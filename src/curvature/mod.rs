//! curvature — Fisher-information estimation and the damped natural-gradient solve.
//!
//! Purpose
//! -------
//! Provide the curvature half of the optimization core: estimate a
//! symmetric Fisher-information matrix from finite-difference probes of a
//! blocking measurement backend, and convert ordinary gradients into
//! curvature-corrected ("natural") directions by solving the damped linear
//! system `(F + damping·I)·x = g`.
//!
//! Key behaviors
//! -------------
//! - Estimate `F` from paired ± coordinate shifts of an
//!   [`ObservableSource`](crate::sources::ObservableSource), with optional
//!   worker-pool dispatch of the mutually independent cells and
//!   cooperative cancellation between them ([`estimator`]).
//! - Solve the damped system with Cholesky-then-LU factorization, failing
//!   fatally with [`CurvatureError::SingularSystem`] when the matrix is
//!   numerically beyond rescue ([`natural`]).
//! - Reduce an estimated matrix to condition number, trace, and largest
//!   eigenvalue for monitoring ([`diagnostics`]).
//! - Centralize dimension/finiteness/configuration checks ([`validation`])
//!   and the error surface ([`errors`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Estimated matrices are symmetric with non-negative diagonals by
//!   construction; violations indicate bugs and trip debug assertions.
//! - `epsilon > 0` and `damping > 0` are validated at every entry point;
//!   nothing proceeds on a poisoned value.
//! - Backend failures belong to the transient class and are flattened into
//!   [`CurvatureError`]; retry policy stays with the caller.
//!
//! Conventions
//! -----------
//! - Vectors and matrices use the crate aliases
//!   ([`Params`](crate::types::Params), [`Grad`](crate::types::Grad),
//!   [`FisherMatrix`](crate::types::FisherMatrix)).
//! - This module performs no I/O and no logging; diagnostics are returned
//!   as values.
//!
//! Downstream usage
//! ----------------
//! - Construct a [`FisherEstimator`] over a measurement backend, call
//!   [`FisherEstimator::compute`] (or `compute_with_cancel`) per step, and
//!   feed the result to [`solve_natural_gradient`] together with an
//!   ordinary gradient.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover analytic recovery, structural
//!   invariants, solve residuals, degenerate and singular systems,
//!   cancellation, timeout, and validation failures.
//! - The crate integration test chains estimation and solve end-to-end.

pub mod diagnostics;
pub mod errors;
pub mod estimator;
pub mod natural;
pub mod validation;

// ---- Re-exports (primary public surface) -----------------------------------

pub use self::diagnostics::FisherDiagnostics;
pub use self::errors::{CurvatureError, CurvatureResult};
pub use self::estimator::{FisherEstimator, FisherOptions};
pub use self::natural::solve_natural_gradient;

// ---- Optional convenience prelude for downstream crates --------------------
//
// Downstream crates can write
//
//     use hybrid_natgrad::curvature::prelude::*;
//
// to import the curvature surface in a single line.

pub mod prelude {
    pub use super::diagnostics::FisherDiagnostics;
    pub use super::errors::{CurvatureError, CurvatureResult};
    pub use super::estimator::{FisherEstimator, FisherOptions};
    pub use super::natural::solve_natural_gradient;
}
