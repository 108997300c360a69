//! Validation helpers for curvature estimation.
//!
//! This module centralizes the consistency checks used across the Fisher
//! estimator and the natural-gradient solver:
//!
//! - **Configuration checks**: [`verify_epsilon`], [`verify_damping`]
//!   ensure numeric knobs are finite and strictly positive.
//! - **Vector validation**: [`validate_params`], [`validate_observable`],
//!   [`validate_grad`] enforce the configured dimension and finite entries.
//! - **Matrix validation**: [`validate_fisher`] enforces a square shape and
//!   finite entries before any factorization.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`CurvatureError`] variants, so higher-level code never proceeds with a
//! poisoned value.
use crate::{
    curvature::errors::{CurvatureError, CurvatureResult},
    types::{FisherMatrix, Grad, Observable, Params},
};

/// Validate the finite-difference step.
///
/// # Errors
/// Returns [`CurvatureError::NonPositiveEpsilon`] if the value is
/// non-finite or ≤ 0.0.
pub fn verify_epsilon(epsilon: f64) -> CurvatureResult<()> {
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(CurvatureError::NonPositiveEpsilon { epsilon });
    }
    Ok(())
}

/// Validate the diagonal damping term.
///
/// # Errors
/// Returns [`CurvatureError::NonPositiveDamping`] if the value is
/// non-finite or ≤ 0.0.
pub fn verify_damping(damping: f64) -> CurvatureResult<()> {
    if !damping.is_finite() || damping <= 0.0 {
        return Err(CurvatureError::NonPositiveDamping { damping });
    }
    Ok(())
}

/// Validate a parameter vector against dimension and finiteness.
///
/// # Errors
/// - [`CurvatureError::ParamsDimMismatch`] if length does not match `dim`.
/// - [`CurvatureError::NonFiniteParam`] with the index/value of the first
///   offending element.
pub fn validate_params(params: &Params, dim: usize) -> CurvatureResult<()> {
    if params.len() != dim {
        return Err(CurvatureError::ParamsDimMismatch { expected: dim, found: params.len() });
    }
    for (index, &value) in params.iter().enumerate() {
        if !value.is_finite() {
            return Err(CurvatureError::NonFiniteParam { index, value });
        }
    }
    Ok(())
}

/// Validate an observable vector against the agreed width and finiteness.
///
/// # Errors
/// - [`CurvatureError::ObservableDimMismatch`] if length does not match `dim`.
/// - [`CurvatureError::NonFiniteObservable`] with the index/value of the
///   first offending element.
pub fn validate_observable(observable: &Observable, dim: usize) -> CurvatureResult<()> {
    if observable.len() != dim {
        return Err(CurvatureError::ObservableDimMismatch {
            expected: dim,
            found: observable.len(),
        });
    }
    for (index, &value) in observable.iter().enumerate() {
        if !value.is_finite() {
            return Err(CurvatureError::NonFiniteObservable { index, value });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`CurvatureError::GradientDimMismatch`] if length does not match `dim`.
/// - [`CurvatureError::NonFiniteGradient`] with the index/value of the
///   first offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> CurvatureResult<()> {
    if grad.len() != dim {
        return Err(CurvatureError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(CurvatureError::NonFiniteGradient { index, value });
        }
    }
    Ok(())
}

/// Validate the shape and entries of a Fisher matrix.
///
/// # Checks
/// 1. Matrix dimensions must equal `dim × dim`.
/// 2. All entries must be finite (no NaN or ±∞).
///
/// # Errors
/// - [`CurvatureError::ParamsDimMismatch`] if dimensions do not match `dim`.
/// - [`CurvatureError::NonFiniteFisher`] if any entry is non-finite, with
///   the offending row/col indices and value.
pub fn validate_fisher(fisher: &FisherMatrix, dim: usize) -> CurvatureResult<()> {
    if fisher.nrows() != dim || fisher.ncols() != dim {
        return Err(CurvatureError::ParamsDimMismatch {
            expected: dim,
            found: fisher.nrows().max(fisher.ncols()),
        });
    }
    for ((row, col), &value) in fisher.indexed_iter() {
        if !value.is_finite() {
            return Err(CurvatureError::NonFiniteFisher { row, col, value });
        }
    }
    Ok(())
}
