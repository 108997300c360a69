//! curvature::estimator — finite-difference Fisher-information estimation.
//!
//! Purpose
//! -------
//! Estimate a symmetric Fisher-information matrix for a parameter vector by
//! probing a blocking [`ObservableSource`] with paired ± coordinate shifts.
//! The estimator owns the probe bookkeeping (shift construction, per-call
//! timing, observable validation) so callers only choose a parameter point
//! and a step size.
//!
//! Key behaviors
//! -------------
//! - Compute diagonal entries from one ± probe pair per coordinate and
//!   off-diagonal entries from two independent probe pairs per coordinate
//!   pair, normalized by `4·ε²` ([`FisherEstimator::compute`]).
//! - Optionally dispatch the mutually independent matrix cells across the
//!   rayon worker pool ([`FisherOptions::parallel`]); results are identical
//!   to the sequential sweep, only wall-clock cost changes.
//! - Honor a [`CancelToken`] between cells, discarding any partially
//!   computed matrix ([`FisherEstimator::compute_with_cancel`]).
//! - Enforce an optional per-evaluation time limit post-hoc
//!   ([`FisherOptions::eval_timeout`]).
//! - Offer a one-call path from ordinary gradient to natural gradient
//!   ([`FisherEstimator::natural_gradient`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The returned matrix is symmetric by construction with a non-negative
//!   diagonal; positive definiteness is NOT guaranteed when noise dominates
//!   signal (downstream damping handles that).
//! - Every observable returned by the backend is validated against the
//!   agreed width and finiteness before it contributes to any cell.
//! - Each cell reads only its own shifted parameter copies and writes a
//!   disjoint matrix entry, which is what makes parallel dispatch safe.
//!
//! Conventions
//! -----------
//! - `ε` is the half-width of the central difference; the backend is
//!   evaluated at `θ ± ε·e_i`, never at `θ` itself.
//! - Cost is `2·n_params²` backend evaluations per matrix; backends are
//!   expected to dominate wall-clock time.
//! - Errors surface as [`CurvatureError`] via [`CurvatureResult`]; this
//!   module never panics on user input.
//!
//! Downstream usage
//! ----------------
//! - Callers convert ordinary gradients with the matrix via
//!   [`solve_natural_gradient`](crate::curvature::natural::solve_natural_gradient)
//!   or the bundled [`FisherEstimator::natural_gradient`].
//! - Spectral summaries for monitoring come from
//!   [`FisherEstimator::diagnostics`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the analytic linear case (exact `AᵀA` recovery),
//!   symmetry and diagonal sign on a nonlinear source, the zero matrix for
//!   a constant source, parallel/sequential agreement, cancellation,
//!   timeout, and validation failures.
//! - Integration tests chain the estimator with the damped solve on
//!   realistic parameter regimes.
use crate::{
    curvature::{
        diagnostics::FisherDiagnostics,
        errors::{CurvatureError, CurvatureResult},
        natural::solve_natural_gradient,
        validation::{validate_grad, validate_observable, validate_params, verify_epsilon},
    },
    sources::{cancel::CancelToken, traits::ObservableSource},
    types::{FisherMatrix, Grad, Observable, Params},
};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Estimation-time configuration for [`FisherEstimator`].
///
/// Fields:
/// - `parallel: bool` — dispatch independent finite-difference cells across
///   the rayon pool instead of sweeping them sequentially.
/// - `eval_timeout: Option<Duration>` — per-evaluation time limit. A
///   blocking backend cannot be preempted, so the limit is enforced after
///   each call returns: an overrunning evaluation fails the sweep with the
///   transient timeout class.
///
/// Default: sequential sweep, no time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FisherOptions {
    pub parallel: bool,
    pub eval_timeout: Option<Duration>,
}

impl FisherOptions {
    /// Create a new set of estimation options.
    pub fn new(parallel: bool, eval_timeout: Option<Duration>) -> Self {
        Self { parallel, eval_timeout }
    }
}

/// Finite-difference Fisher-information estimator over one measurement
/// backend.
///
/// Construction fixes the probe shape for the lifetime of the estimator:
/// `n_params` (parameter vector length) and `n_observables` (agreed
/// measurement width). Every probe result is validated against that shape.
#[derive(Debug, Clone)]
pub struct FisherEstimator<S: ObservableSource> {
    source: S,
    n_params: usize,
    n_observables: usize,
    options: FisherOptions,
}

impl<S: ObservableSource> FisherEstimator<S> {
    /// Create an estimator over `source` with a fixed probe shape.
    ///
    /// # Errors
    /// Returns [`CurvatureError::InvalidShape`] when either dimension is
    /// zero.
    pub fn new(
        source: S, n_params: usize, n_observables: usize, options: FisherOptions,
    ) -> CurvatureResult<Self> {
        if n_params == 0 || n_observables == 0 {
            return Err(CurvatureError::InvalidShape { n_params, n_observables });
        }
        Ok(Self { source, n_params, n_observables, options })
    }

    /// Parameter vector length this estimator probes.
    pub fn n_params(&self) -> usize {
        self.n_params
    }

    /// Agreed measurement width of the backend.
    pub fn n_observables(&self) -> usize {
        self.n_observables
    }

    /// Estimation options in effect.
    pub fn options(&self) -> &FisherOptions {
        &self.options
    }

    /// compute — estimate the Fisher matrix at a parameter point.
    ///
    /// Purpose
    /// -------
    /// Probe the backend with paired ± coordinate shifts and assemble the
    /// symmetric Fisher matrix:
    /// - diagonal: `F[i][i] = Σ d_i ⊙ d_i / (4·ε²)` where `d_i` is the
    ///   elementwise difference of the observables at `θ ± ε·e_i`;
    /// - off-diagonal (`i < j`): `F[i][j] = F[j][i] = Σ d_i ⊙ d_j / (4·ε²)`
    ///   from two fresh, independent probe pairs.
    ///
    /// Parameters
    /// ----------
    /// - `params`: `&Params`
    ///   Point at which curvature is estimated. Length must equal the
    ///   configured `n_params`; entries must be finite.
    /// - `epsilon`: `f64`
    ///   Finite-difference half-width; must be finite and strictly
    ///   positive. [`DEFAULT_EPSILON`](crate::types::DEFAULT_EPSILON) is
    ///   the conventional choice.
    ///
    /// Returns
    /// -------
    /// `CurvatureResult<FisherMatrix>`
    ///   An `n_params × n_params` matrix, symmetric by construction with a
    ///   non-negative diagonal. Not guaranteed positive definite when the
    ///   backend's noise dominates the signal.
    ///
    /// Errors
    /// ------
    /// - [`CurvatureError::NonPositiveEpsilon`] for an invalid step.
    /// - [`CurvatureError::ParamsDimMismatch`] / `NonFiniteParam` for an
    ///   invalid parameter vector.
    /// - [`CurvatureError::ObservableDimMismatch`] / `NonFiniteObservable`
    ///   when the backend violates its output contract.
    /// - [`CurvatureError::TransientEvaluation`] /
    ///   [`CurvatureError::EvaluationTimeout`] for backend failures; the
    ///   caller owns any retry policy.
    ///
    /// Panics
    /// ------
    /// - Never panics on user input. A symmetry or diagonal-sign violation
    ///   in the assembled matrix would be a programming error and is
    ///   guarded by debug assertions.
    ///
    /// Notes
    /// -----
    /// - Every cell uses fresh probes; nothing is cached across cells, so
    ///   a stochastic backend contributes independent noise per cell.
    /// - With `options.parallel`, cells are dispatched across the rayon
    ///   pool; outputs are identical to the sequential sweep.
    pub fn compute(&self, params: &Params, epsilon: f64) -> CurvatureResult<FisherMatrix> {
        self.compute_inner(params, epsilon, None)
    }

    /// compute_with_cancel — abortable variant of [`FisherEstimator::compute`].
    ///
    /// The token is checked before every cell. On cancellation the sweep
    /// stops, the partially filled matrix is discarded, and
    /// [`CurvatureError::Cancelled`] is returned; already-running backend
    /// calls are allowed to finish but their results are dropped.
    pub fn compute_with_cancel(
        &self, params: &Params, epsilon: f64, cancel: &CancelToken,
    ) -> CurvatureResult<FisherMatrix> {
        self.compute_inner(params, epsilon, Some(cancel))
    }

    /// natural_gradient — Fisher estimation and damped solve in one call.
    ///
    /// Computes the Fisher matrix at `params` with step `epsilon`, then
    /// solves `(F + damping·I)·x = grad` for the natural gradient `x`.
    ///
    /// # Errors
    /// - Any error of [`FisherEstimator::compute`].
    /// - [`CurvatureError::GradientDimMismatch`] / `NonFiniteGradient` for
    ///   an invalid gradient.
    /// - [`CurvatureError::NonPositiveDamping`] /
    ///   [`CurvatureError::SingularSystem`] from the solve.
    pub fn natural_gradient(
        &self, params: &Params, grad: &Grad, epsilon: f64, damping: f64,
    ) -> CurvatureResult<Grad> {
        validate_grad(grad, self.n_params)?;
        let fisher = self.compute(params, epsilon)?;
        solve_natural_gradient(&fisher, grad, damping)
    }

    /// diagnostics — spectral summary of the Fisher matrix at `params`.
    ///
    /// Computes the matrix with [`FisherEstimator::compute`] and reduces it
    /// to [`FisherDiagnostics`] (condition number, trace, largest
    /// eigenvalue) for convergence monitoring.
    ///
    /// # Errors
    /// Any error of [`FisherEstimator::compute`].
    pub fn diagnostics(&self, params: &Params, epsilon: f64) -> CurvatureResult<FisherDiagnostics> {
        let fisher = self.compute(params, epsilon)?;
        FisherDiagnostics::from_fisher(&fisher)
    }

    // ---- Helper methods ----

    fn compute_inner(
        &self, params: &Params, epsilon: f64, cancel: Option<&CancelToken>,
    ) -> CurvatureResult<FisherMatrix> {
        verify_epsilon(epsilon)?;
        validate_params(params, self.n_params)?;

        let n = self.n_params;
        let cells: Vec<(usize, usize)> =
            (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();

        let evaluate_cell = |&(i, j): &(usize, usize)| -> CurvatureResult<(usize, usize, f64)> {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(CurvatureError::Cancelled);
                }
            }
            self.cell(params, i, j, epsilon).map(|value| (i, j, value))
        };

        let values: Vec<(usize, usize, f64)> = if self.options.parallel {
            cells.par_iter().map(evaluate_cell).collect::<CurvatureResult<_>>()?
        } else {
            cells.iter().map(evaluate_cell).collect::<CurvatureResult<_>>()?
        };

        let mut fisher = FisherMatrix::zeros((n, n));
        for (i, j, value) in values {
            fisher[[i, j]] = value;
            fisher[[j, i]] = value;
        }

        debug_assert!(
            (0..n).all(|i| fisher[[i, i]] >= 0.0),
            "assembled Fisher matrix has a negative diagonal entry"
        );
        Ok(fisher)
    }

    /// One matrix cell from fresh probe pairs. Diagonal cells reuse a
    /// single pair; off-diagonal cells take two independent pairs (four
    /// backend evaluations).
    fn cell(&self, params: &Params, i: usize, j: usize, epsilon: f64) -> CurvatureResult<f64> {
        let norm = 4.0 * epsilon * epsilon;
        if i == j {
            let d = self.probe_difference(params, i, epsilon)?;
            Ok(d.dot(&d) / norm)
        } else {
            let d_i = self.probe_difference(params, i, epsilon)?;
            let d_j = self.probe_difference(params, j, epsilon)?;
            Ok(d_i.dot(&d_j) / norm)
        }
    }

    /// Observable difference across the ± pair for one coordinate.
    fn probe_difference(
        &self, params: &Params, coord: usize, epsilon: f64,
    ) -> CurvatureResult<Observable> {
        let plus = self.probe(params, coord, epsilon)?;
        let minus = self.probe(params, coord, -epsilon)?;
        Ok(plus - minus)
    }

    /// Single timed, validated backend evaluation at a shifted point.
    fn probe(&self, params: &Params, coord: usize, delta: f64) -> CurvatureResult<Observable> {
        let mut shifted = params.clone();
        shifted[coord] += delta;

        let started = Instant::now();
        let observable = self.source.evaluate(&shifted)?;
        if let Some(limit) = self.options.eval_timeout {
            let elapsed = started.elapsed();
            if elapsed > limit {
                return Err(CurvatureError::EvaluationTimeout {
                    elapsed_ms: elapsed.as_millis() as u64,
                    limit_ms: limit.as_millis() as u64,
                });
            }
        }

        validate_observable(&observable, self.n_observables)?;
        Ok(observable)
    }
}
