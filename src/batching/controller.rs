//! batching::controller — adaptive batch-size control from gradient statistics.
//!
//! Purpose
//! -------
//! Decide how many samples the measurement process should take on the next
//! optimization step. The controller follows a fixed linear warmup
//! schedule first, then adapts within `[b_min, b_max]` from two short
//! rolling statistics: the current gradient norm (pushes the batch up) and
//! the recent gradient-norm variance (pulls it down).
//!
//! Key behaviors
//! -------------
//! - Warmup (`step_count < warmup_steps`): linear interpolation from
//!   `b_min` toward `b_max`, independent of gradient statistics, so batch
//!   sizes grow monotonically (or stay constant when `b_max == b_min`).
//! - Steady state: `grad_factor = 2/(1 + exp(-α·‖g‖)) − 1` in (0, 1) for
//!   positive norms, `var_factor = exp(-Var)` from the population variance
//!   of the 10 most recent norms, result clipped to `[b_min, b_max]` and
//!   truncated to an integer.
//! - Reporting ([`BatchSizeController::metrics`]): average batch size,
//!   gradient-norm variance, and distinct-batch "efficiency" over the 100
//!   most recent steps, with fixed defaults for an empty history.
//! - [`BatchSizeController::reset`] clears the step counter and both
//!   histories — the only deletion path for controller state.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every returned batch size lies in `[b_min, b_max]` inclusive for any
//!   finite input; this is a debug-asserted postcondition, not a runtime
//!   error path.
//! - Histories are bounded ring buffers ([`RollingWindow`]); memory does
//!   not grow with run length.
//! - State is mutated only through `&mut self`; two overlapping steps must
//!   either serialize their calls or own independent controllers. The type
//!   is deliberately not wrapped in interior mutability.
//!
//! Conventions
//! -----------
//! - The variance window reads the controller's own recorded norms, not
//!   caller-supplied aggregates; callers feed one norm per step.
//! - `loss_value` is validated but currently unused by the adaptation
//!   formula; it is part of the call contract for interface stability.
//! - The variance factor *shrinks* the batch as gradient-norm variance
//!   grows. That is the modeled behavior, reproduced as-is.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the warmup interpolation (including the 272 midpoint
//!   for the default bounds), bounds for extreme finite inputs, the
//!   10-entry variance gate, metric defaults after reset, and input
//!   validation.
use crate::batching::{
    errors::{BatchError, BatchResult},
    history::RollingWindow,
};
use statrs::statistics::Statistics;
use std::collections::HashSet;

/// Window over recent gradient norms used by the steady-state variance
/// factor.
pub const VARIANCE_WINDOW: usize = 10;

/// Window over recent steps used by [`BatchSizeController::metrics`].
pub const REPORT_WINDOW: usize = 100;

/// Validated configuration for [`BatchSizeController`].
///
/// Fields:
/// - `b_min`, `b_max` — inclusive batch-size bounds, `1 <= b_min <= b_max`.
/// - `alpha` — adaptation rate in the sigmoid gradient factor; finite and
///   strictly positive.
/// - `warmup_steps` — length of the linear warmup schedule; zero disables
///   warmup entirely.
///
/// Default: `{ b_min: 32, b_max: 512, alpha: 0.1, warmup_steps: 100 }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOptions {
    pub b_min: usize,
    pub b_max: usize,
    pub alpha: f64,
    pub warmup_steps: usize,
}

impl BatchOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`BatchError::InvalidBounds`] unless `1 <= b_min <= b_max`.
    /// - [`BatchError::InvalidAdaptationRate`] for a non-finite or
    ///   non-positive `alpha`.
    pub fn new(
        b_min: usize, b_max: usize, alpha: f64, warmup_steps: usize,
    ) -> BatchResult<Self> {
        if b_min == 0 || b_min > b_max {
            return Err(BatchError::InvalidBounds { b_min, b_max });
        }
        if !alpha.is_finite() {
            return Err(BatchError::InvalidAdaptationRate {
                alpha,
                reason: "Adaptation rate must be finite.",
            });
        }
        if alpha <= 0.0 {
            return Err(BatchError::InvalidAdaptationRate {
                alpha,
                reason: "Adaptation rate must be positive.",
            });
        }
        Ok(Self { b_min, b_max, alpha, warmup_steps })
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { b_min: 32, b_max: 512, alpha: 0.1, warmup_steps: 100 }
    }
}

/// Step-window report returned by [`BatchSizeController::metrics`].
///
/// - `avg_batch_size`: mean recorded batch size over the report window.
/// - `grad_variance`: population variance of the recorded gradient norms
///   over the report window.
/// - `batch_efficiency`: distinct recorded batch sizes divided by the
///   fixed window length (a short history therefore reports a small
///   efficiency).
///
/// An empty history reports `{ b_min as f64, 0.0, 1.0 }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchMetrics {
    pub avg_batch_size: f64,
    pub grad_variance: f64,
    pub batch_efficiency: f64,
}

/// Adaptive batch-size controller.
///
/// Owns its rolling histories; see the module docs for the schedule and
/// the sharing rules.
#[derive(Debug, Clone)]
pub struct BatchSizeController {
    opts: BatchOptions,
    step_count: usize,
    grad_history: RollingWindow<f64>,
    batch_history: RollingWindow<usize>,
}

impl BatchSizeController {
    /// Create a controller from validated options.
    pub fn new(opts: BatchOptions) -> Self {
        Self {
            opts,
            step_count: 0,
            grad_history: RollingWindow::new(REPORT_WINDOW),
            batch_history: RollingWindow::new(REPORT_WINDOW),
        }
    }

    /// Options this controller was built with.
    pub fn options(&self) -> &BatchOptions {
        &self.opts
    }

    /// Number of `next_batch_size` calls since construction or the last
    /// [`reset`](BatchSizeController::reset).
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// next_batch_size — sample count for the next optimization step.
    ///
    /// Purpose
    /// -------
    /// Record this step's gradient norm and batch size, then emit the next
    /// batch size from the warmup schedule or the steady-state adaptation
    /// formula.
    ///
    /// Parameters
    /// ----------
    /// - `grad_norm`: `f64`
    ///   Norm of the current combined gradient; must be finite. Negative
    ///   values are accepted and drive the batch toward `b_min`.
    /// - `loss_value`: `f64`
    ///   Current loss; must be finite. Unused by the adaptation formula.
    /// - `current_batch`: `usize`
    ///   Batch size used on the step being recorded.
    ///
    /// Returns
    /// -------
    /// `BatchResult<usize>`
    ///   The next batch size, always within `[b_min, b_max]` inclusive.
    ///
    /// Errors
    /// ------
    /// - [`BatchError::NonFiniteGradNorm`] / [`BatchError::NonFiniteLoss`]
    ///   for NaN or infinite inputs; state is not mutated in that case.
    ///
    /// Notes
    /// -----
    /// - The step counter increments before the warmup comparison, so with
    ///   `warmup_steps = w` the calls `1..w-1` follow the schedule and call
    ///   `w` is the first steady-state decision.
    /// - The variance factor stays 1 until more than [`VARIANCE_WINDOW`]
    ///   norms have been recorded.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use hybrid_natgrad::batching::{BatchOptions, BatchSizeController};
    /// let mut controller = BatchSizeController::new(BatchOptions::default());
    ///
    /// // First warmup step of the default schedule: 32 + 480 · 1/100.
    /// let next = controller.next_batch_size(1.0, 0.5, 32).unwrap();
    /// assert_eq!(next, 36);
    /// ```
    pub fn next_batch_size(
        &mut self, grad_norm: f64, loss_value: f64, current_batch: usize,
    ) -> BatchResult<usize> {
        if !grad_norm.is_finite() {
            return Err(BatchError::NonFiniteGradNorm { value: grad_norm });
        }
        if !loss_value.is_finite() {
            return Err(BatchError::NonFiniteLoss { value: loss_value });
        }

        self.step_count += 1;
        self.grad_history.push(grad_norm);
        self.batch_history.push(current_batch);

        let span = (self.opts.b_max - self.opts.b_min) as f64;
        let next = if self.step_count < self.opts.warmup_steps {
            let ratio = self.step_count as f64 / self.opts.warmup_steps as f64;
            (self.opts.b_min as f64 + span * ratio) as usize
        } else {
            let grad_var = if self.grad_history.len() > VARIANCE_WINDOW {
                self.grad_history.last_n(VARIANCE_WINDOW).population_variance()
            } else {
                0.0
            };
            let grad_factor = 2.0 / (1.0 + (-self.opts.alpha * grad_norm).exp()) - 1.0;
            let var_factor = (-grad_var).exp();
            let raw = self.opts.b_min as f64 + span * grad_factor * var_factor;
            raw.clamp(self.opts.b_min as f64, self.opts.b_max as f64) as usize
        };

        debug_assert!(
            (self.opts.b_min..=self.opts.b_max).contains(&next),
            "batch size {next} escaped [{}, {}]",
            self.opts.b_min,
            self.opts.b_max
        );
        Ok(next)
    }

    /// Step-window report over the most recent [`REPORT_WINDOW`] steps.
    ///
    /// Returns the documented defaults when no step has been recorded:
    /// average batch size `b_min`, zero variance, efficiency 1.
    pub fn metrics(&self) -> BatchMetrics {
        if self.grad_history.is_empty() {
            return BatchMetrics {
                avg_batch_size: self.opts.b_min as f64,
                grad_variance: 0.0,
                batch_efficiency: 1.0,
            };
        }
        let avg_batch_size =
            self.batch_history.last_n(REPORT_WINDOW).map(|&b| b as f64).mean();
        let grad_variance = self.grad_history.last_n(REPORT_WINDOW).population_variance();
        let distinct: HashSet<usize> =
            self.batch_history.last_n(REPORT_WINDOW).copied().collect();
        let batch_efficiency = distinct.len() as f64 / REPORT_WINDOW as f64;
        BatchMetrics { avg_batch_size, grad_variance, batch_efficiency }
    }

    /// Clear the step counter and both histories.
    pub fn reset(&mut self) {
        self.step_count = 0;
        self.grad_history.clear();
        self.batch_history.clear();
    }
}
