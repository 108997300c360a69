//! Capability interfaces for measurement and gradient backends.
//!
//! - [`ObservableSource`]: blocking, possibly stochastic measurement of an
//!   observable vector at a parameter point.
//! - [`GradientSource`]: evaluation of a scalar loss and its gradient, with
//!   a declared numeric [`Precision`].
//! - [`GradientEstimate`]: a gradient tagged with its originating
//!   [`GradientPath`] and precision, as produced per optimization step.
//!
//! Convention: the core consumes these traits and never inspects the
//! concrete backend type. Backends must not retain or mutate the parameter
//! vectors they are handed. Reproducibility is the backend's concern: a
//! stochastic implementation should own an explicitly seeded RNG rather
//! than read ambient global state.
use crate::{
    sources::errors::SourceResult,
    types::{Grad, Observable, Params},
};
use ndarray::Array1;

/// Identity of the computation path that produced a gradient estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientPath {
    /// Cheap path with reduced numerical stability.
    Fast,
    /// Slow path with full numerical stability.
    Stable,
}

/// Numeric precision a gradient source computes at.
///
/// `Reduced` marks estimates whose entries were computed on a narrower
/// float grid (and widened to `f64` at the boundary); fusion rounds such
/// estimates through `f32` so both operands share one representable grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Reduced,
    Full,
}

/// A per-step gradient estimate tagged with its origin.
///
/// Ephemeral: produced by one optimization step, consumed by fusion, never
/// retained. The `values` length always equals the run's `n_params`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientEstimate {
    pub values: Grad,
    pub path: GradientPath,
    pub precision: Precision,
}

impl GradientEstimate {
    /// Tag a raw gradient with its path and precision.
    pub fn new(values: Grad, path: GradientPath, precision: Precision) -> Self {
        Self { values, path, precision }
    }

    /// Number of parameters the estimate covers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the estimate is empty (zero parameters).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Blocking measurement capability.
///
/// Implementations map a parameter vector to a fresh vector of noisy scalar
/// measurements whose variance shrinks with the backend's sample count. For
/// a given configuration the returned vector must always have the same,
/// previously agreed length.
///
/// `Send + Sync` is required so independent finite-difference evaluations
/// can be dispatched across a worker pool; a purely sequential backend can
/// satisfy this trivially by owning no shared mutable state.
pub trait ObservableSource: Send + Sync {
    /// Evaluate the observables at `params`.
    ///
    /// # Errors
    /// Returns a [`SourceError`](crate::sources::errors::SourceError) for
    /// transient backend failures; the caller owns any retry policy.
    fn evaluate(&self, params: &Params) -> SourceResult<Observable>;
}

impl<F> ObservableSource for F
where
    F: Fn(&Params) -> SourceResult<Observable> + Send + Sync,
{
    fn evaluate(&self, params: &Params) -> SourceResult<Observable> {
        self(params)
    }
}

/// Loss-and-gradient capability.
///
/// Two instances back one
/// [`HybridStepOrchestrator`](crate::hybrid::HybridStepOrchestrator): a
/// fast/reduced-precision path and a stable/full-precision path. Both must
/// produce gradients of the same length as the parameter vector.
pub trait GradientSource {
    /// Evaluate the loss and its gradient at `params` for the given inputs.
    ///
    /// # Errors
    /// Returns a [`SourceError`](crate::sources::errors::SourceError) for
    /// transient backend failures; the caller owns any retry policy.
    fn evaluate(&self, inputs: &Array1<f64>, params: &Params) -> SourceResult<(f64, Grad)>;

    /// Precision this source computes at. Defaults to [`Precision::Full`].
    fn precision(&self) -> Precision {
        Precision::Full
    }
}

impl<F> GradientSource for F
where
    F: Fn(&Array1<f64>, &Params) -> SourceResult<(f64, Grad)>,
{
    fn evaluate(&self, inputs: &Array1<f64>, params: &Params) -> SourceResult<(f64, Grad)> {
        self(inputs, params)
    }
}
