//! hybrid::orchestrator — one optimization step over two gradient paths.
//!
//! Purpose
//! -------
//! Wire the fusion engine and the batch controller into a single step:
//! evaluate the fast and stable gradient backends, correct the fast
//! estimate for its known precision bias, fuse, descend, and report
//! diagnostics together with the sample count the caller should use next.
//!
//! Key behaviors
//! -------------
//! - Evaluate both [`GradientSource`] backends at the same
//!   `(inputs, params)` point; both must produce gradients of the
//!   parameter length with finite entries.
//! - Scale the fast-path gradient by the fixed correction coefficient
//!   `beta` *before* fusion; the reported fast-gradient norm is the
//!   corrected one.
//! - Fuse with the configured `alpha` via [`merge`], then update
//!   `params_next = params − learning_rate · combined`.
//! - Query the owned [`BatchSizeController`] with the combined gradient
//!   norm and the stable-path loss, surfacing its answer in
//!   [`StepMetrics::next_batch_size`].
//!
//! Invariants & assumptions
//! ------------------------
//! - No state is retained between steps beyond the two backends, the
//!   validated options, and the owned controller.
//! - The stable path's loss feeds the controller; the fast path's loss is
//!   biased by construction and is not used for control decisions.
//!
//! Conventions
//! -----------
//! - Errors surface as [`HybridError`] via [`HybridResult`]; backend and
//!   controller failures are flattened into the same enum.
//! - This module performs no I/O and no logging; diagnostics are returned
//!   as values.
//!
//! Testing notes
//! -------------
//! - Unit tests cover descent on a quadratic, the post-`beta` metric
//!   norm, batch-size bounds, and propagation of backend failures.
//! - The crate integration test drives multi-step descent with both
//!   paths backed by analytic gradients.
use crate::{
    batching::controller::{BatchMetrics, BatchOptions, BatchSizeController},
    hybrid::{
        errors::{HybridError, HybridResult},
        fusion::merge,
    },
    sources::traits::{GradientEstimate, GradientPath, GradientSource},
    types::{Grad, Params},
};
use ndarray::Array1;

/// Validated step-level configuration.
///
/// Fields:
/// - `alpha` — fusion weight base handed to [`merge`]; finite, ≥ 0.
/// - `beta` — fast-path correction coefficient applied before fusion;
///   finite, > 0.
/// - `learning_rate` — descent step size; finite, > 0.
///
/// Default: `{ alpha: 0.7, beta: 0.78, learning_rate: 0.01 }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridOptions {
    pub alpha: f64,
    pub beta: f64,
    pub learning_rate: f64,
}

impl HybridOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`HybridError::InvalidFusionBase`] for a non-finite or negative
    ///   `alpha`.
    /// - [`HybridError::InvalidCorrection`] for a non-finite or
    ///   non-positive `beta`.
    /// - [`HybridError::InvalidLearningRate`] for a non-finite or
    ///   non-positive `learning_rate`.
    pub fn new(alpha: f64, beta: f64, learning_rate: f64) -> HybridResult<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(HybridError::InvalidFusionBase {
                alpha,
                reason: "Fusion weight base must be finite and non-negative.",
            });
        }
        if !beta.is_finite() || beta <= 0.0 {
            return Err(HybridError::InvalidCorrection {
                beta,
                reason: "Correction coefficient must be finite and positive.",
            });
        }
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(HybridError::InvalidLearningRate {
                learning_rate,
                reason: "Learning rate must be finite and positive.",
            });
        }
        Ok(Self { alpha, beta, learning_rate })
    }
}

impl Default for HybridOptions {
    fn default() -> Self {
        Self { alpha: 0.7, beta: 0.78, learning_rate: 0.01 }
    }
}

/// Per-step diagnostics returned by [`HybridStepOrchestrator::step`].
///
/// Norms are Euclidean; `fast_grad_norm` is measured after the `beta`
/// correction. `next_batch_size` is the controller's answer for the
/// following step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    pub fast_grad_norm: f64,
    pub stable_grad_norm: f64,
    pub combined_grad_norm: f64,
    pub loss: f64,
    pub next_batch_size: usize,
}

/// Orchestrator over one fast and one stable gradient backend.
#[derive(Debug, Clone)]
pub struct HybridStepOrchestrator<F: GradientSource, S: GradientSource> {
    fast: F,
    stable: S,
    options: HybridOptions,
    batch: BatchSizeController,
}

impl<F: GradientSource, S: GradientSource> HybridStepOrchestrator<F, S> {
    /// Create an orchestrator over the two backends.
    ///
    /// `options` and `batch_options` are already validated by their
    /// constructors; this call cannot fail.
    pub fn new(fast: F, stable: S, options: HybridOptions, batch_options: BatchOptions) -> Self {
        Self { fast, stable, options, batch: BatchSizeController::new(batch_options) }
    }

    /// Step-level options in effect.
    pub fn options(&self) -> &HybridOptions {
        &self.options
    }

    /// Batch-controller report over its recent window.
    pub fn batch_metrics(&self) -> BatchMetrics {
        self.batch.metrics()
    }

    /// Clear the owned batch controller's statistics.
    pub fn reset_batch_stats(&mut self) {
        self.batch.reset();
    }

    /// step — one hybrid optimization step.
    ///
    /// Purpose
    /// -------
    /// Evaluate both gradient paths at `(inputs, params)`, fuse them, and
    /// descend:
    /// 1. fast path → `(loss_fast, g_fast)`; stable path →
    ///    `(loss_stable, g_stable)`;
    /// 2. `g_fast ← beta · g_fast` (precision-bias correction);
    /// 3. `combined = merge(g_fast, g_stable, alpha)`;
    /// 4. `params_next = params − learning_rate · combined`;
    /// 5. controller query with `‖combined‖`, `loss_stable`, and
    ///    `current_batch`.
    ///
    /// Parameters
    /// ----------
    /// - `inputs`: `&Array1<f64>`
    ///   Feature/input vector handed through to both backends.
    /// - `params`: `Params`
    ///   Current parameter vector; consumed and returned updated.
    /// - `current_batch`: `usize`
    ///   Sample count used for the measurements behind this step; recorded
    ///   by the controller.
    ///
    /// Returns
    /// -------
    /// `HybridResult<(Params, StepMetrics)>`
    ///   The updated parameters and the step diagnostics.
    ///
    /// Errors
    /// ------
    /// - [`HybridError::TransientEvaluation`] /
    ///   [`HybridError::EvaluationTimeout`] from either backend; the
    ///   caller owns any retry policy.
    /// - [`HybridError::GradientDimMismatch`] / `NonFiniteGradient` /
    ///   `NonFiniteLoss` when a backend violates its contract.
    /// - Fusion and controller errors as documented on [`merge`] and
    ///   [`BatchSizeController::next_batch_size`].
    pub fn step(
        &mut self, inputs: &Array1<f64>, params: Params, current_batch: usize,
    ) -> HybridResult<(Params, StepMetrics)> {
        let n = params.len();

        let (fast_loss, fast_grad) = self.fast.evaluate(inputs, &params)?;
        validate_loss(fast_loss)?;
        validate_gradient(&fast_grad, n)?;
        let (stable_loss, stable_grad) = self.stable.evaluate(inputs, &params)?;
        validate_loss(stable_loss)?;
        validate_gradient(&stable_grad, n)?;

        let corrected = fast_grad * self.options.beta;
        let fast_estimate =
            GradientEstimate::new(corrected, GradientPath::Fast, self.fast.precision());
        let stable_estimate =
            GradientEstimate::new(stable_grad, GradientPath::Stable, self.stable.precision());

        let combined = merge(&fast_estimate, &stable_estimate, self.options.alpha)?;
        let updated = params - &combined * self.options.learning_rate;

        let fast_grad_norm = l2_norm(&fast_estimate.values);
        let stable_grad_norm = l2_norm(&stable_estimate.values);
        let combined_grad_norm = l2_norm(&combined);
        let next_batch_size =
            self.batch.next_batch_size(combined_grad_norm, stable_loss, current_batch)?;

        Ok((
            updated,
            StepMetrics {
                fast_grad_norm,
                stable_grad_norm,
                combined_grad_norm,
                loss: stable_loss,
                next_batch_size,
            },
        ))
    }
}

// ---- Helper methods ----

fn l2_norm(grad: &Grad) -> f64 {
    grad.dot(grad).sqrt()
}

fn validate_loss(loss: f64) -> HybridResult<()> {
    if !loss.is_finite() {
        return Err(HybridError::NonFiniteLoss { value: loss });
    }
    Ok(())
}

fn validate_gradient(grad: &Grad, dim: usize) -> HybridResult<()> {
    if grad.len() != dim {
        return Err(HybridError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(HybridError::NonFiniteGradient { index, value });
        }
    }
    Ok(())
}
