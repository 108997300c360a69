//! types — canonical numeric aliases and crate-wide defaults.
//!
//! Purpose
//! -------
//! Centralize the core numeric types shared by every subsystem: parameter
//! vectors, gradients, observable vectors, and the Fisher matrix. Defining
//! these in one place keeps the rest of the crate agnostic to the `ndarray`
//! backend and makes the dimension conventions explicit.
//!
//! Conventions
//! -----------
//! - [`Params`] and [`Grad`] are treated as column vectors of length
//!   `n_params`, the number of free parameters for the lifetime of a run.
//! - [`Observable`] has length `n_observables`, the fixed measurement width
//!   agreed with the backend; entries are nominally in `[-1, 1]`.
//! - [`FisherMatrix`] is dense, `n_params × n_params`, symmetric with a
//!   non-negative diagonal when produced by the estimator.
//! - All containers hold `f64`; reduced-precision paths widen to `f64` at
//!   the capability boundary and are tracked by a precision tag instead of
//!   a separate element type.
//!
//! Testing notes
//! -------------
//! - This module only defines aliases and constants; correctness is
//!   exercised by the modules that instantiate them.
use ndarray::{Array1, Array2};

/// Parameter vector `θ` driving the measurement process.
///
/// Alias for `ndarray::Array1<f64>`; fixed length `n_params` per run.
pub type Params = Array1<f64>;

/// Gradient vector with respect to [`Params`].
///
/// Alias for `ndarray::Array1<f64>`, matching the shape of [`Params`].
pub type Grad = Array1<f64>;

/// Noisy measurement vector returned by an observable backend.
///
/// Alias for `ndarray::Array1<f64>`; fixed length `n_observables` per
/// configuration, entries nominally in `[-1, 1]`.
pub type Observable = Array1<f64>;

/// Dense Fisher-information matrix.
///
/// Alias for `ndarray::Array2<f64>`; `n × n` for `n = Params.len()`.
pub type FisherMatrix = Array2<f64>;

/// Default finite-difference step for Fisher estimation.
pub const DEFAULT_EPSILON: f64 = 0.01;

/// Default diagonal damping for the natural-gradient solve.
pub const DEFAULT_DAMPING: f64 = 1e-4;
