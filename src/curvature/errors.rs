//! Unified error handling for Fisher estimation and the damped solve.
//!
//! This module defines `CurvatureError`, the central error type for the
//! finite-difference Fisher estimator, the natural-gradient solver, and the
//! eigen-based diagnostics. It groups configuration failures, dimension and
//! finiteness violations, the fatal singular-solve case, and the flattened
//! transient evaluation class. An alias `CurvatureResult<T>` standardizes
//! the return type across curvature code.
use crate::sources::errors::SourceError;

/// Crate-wide result alias for curvature operations.
pub type CurvatureResult<T> = Result<T, CurvatureError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CurvatureError {
    // ---- Configuration ----
    /// Finite-difference step must be strictly positive and finite.
    NonPositiveEpsilon {
        epsilon: f64,
    },

    /// Diagonal damping must be strictly positive and finite.
    NonPositiveDamping {
        damping: f64,
    },

    /// Probe shape must have at least one parameter and one observable.
    InvalidShape {
        n_params: usize,
        n_observables: usize,
    },

    // ---- Dimensions ----
    /// Parameter vector length disagrees with the configured `n_params`.
    ParamsDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Observable vector length disagrees with the agreed `n_observables`.
    ObservableDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient length disagrees with the Fisher dimension.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Finiteness ----
    /// Parameter entries must be finite.
    NonFiniteParam {
        index: usize,
        value: f64,
    },

    /// Observable entries must be finite.
    NonFiniteObservable {
        index: usize,
        value: f64,
    },

    /// Fisher matrix entries must be finite.
    NonFiniteFisher {
        row: usize,
        col: usize,
        value: f64,
    },

    /// Gradient entries must be finite.
    NonFiniteGradient {
        index: usize,
        value: f64,
    },

    // ---- Solve ----
    /// The damped system could not be factorized; fatal for the step.
    SingularSystem {
        damping: f64,
    },

    // ---- Sweep control ----
    /// The caller aborted the sweep; any partial matrix was discarded.
    Cancelled,

    // ---- Evaluation (flattened transient class) ----
    /// Wrapper for `SourceError::Transient`.
    TransientEvaluation {
        reason: String,
    },

    /// Wrapper for `SourceError::Timeout`.
    EvaluationTimeout {
        elapsed_ms: u64,
        limit_ms: u64,
    },
}

impl std::error::Error for CurvatureError {}

impl std::fmt::Display for CurvatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            CurvatureError::NonPositiveEpsilon { epsilon } => {
                write!(f, "Invalid finite-difference step {epsilon}: must be finite and > 0")
            }
            CurvatureError::NonPositiveDamping { damping } => {
                write!(f, "Invalid damping {damping}: must be finite and > 0")
            }
            CurvatureError::InvalidShape { n_params, n_observables } => write!(
                f,
                "Invalid probe shape ({n_params} params, {n_observables} observables): both must be >= 1"
            ),

            // ---- Dimensions ----
            CurvatureError::ParamsDimMismatch { expected, found } => {
                write!(f, "Parameter dimension mismatch: expected {expected}, found {found}")
            }
            CurvatureError::ObservableDimMismatch { expected, found } => {
                write!(f, "Observable dimension mismatch: expected {expected}, found {found}")
            }
            CurvatureError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }

            // ---- Finiteness ----
            CurvatureError::NonFiniteParam { index, value } => {
                write!(f, "Invalid parameter at index {index}: {value}, must be finite")
            }
            CurvatureError::NonFiniteObservable { index, value } => {
                write!(f, "Invalid observable at index {index}: {value}, must be finite")
            }
            CurvatureError::NonFiniteFisher { row, col, value } => {
                write!(f, "Invalid Fisher entry at ({row}, {col}): {value}, must be finite")
            }
            CurvatureError::NonFiniteGradient { index, value } => {
                write!(f, "Invalid gradient at index {index}: {value}, must be finite")
            }

            // ---- Solve ----
            CurvatureError::SingularSystem { damping } => write!(
                f,
                "Damped system is numerically singular despite damping {damping}; \
                 the step cannot proceed with these inputs"
            ),

            // ---- Sweep control ----
            CurvatureError::Cancelled => {
                write!(f, "Finite-difference sweep cancelled before completion")
            }

            // ---- Evaluation ----
            CurvatureError::TransientEvaluation { reason } => {
                write!(f, "Transient evaluation failure: {reason}")
            }
            CurvatureError::EvaluationTimeout { elapsed_ms, limit_ms } => write!(
                f,
                "Evaluation took {elapsed_ms} ms, exceeding the {limit_ms} ms limit"
            ),
        }
    }
}

impl From<SourceError> for CurvatureError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Transient { reason } => CurvatureError::TransientEvaluation { reason },
            SourceError::Timeout { elapsed_ms, limit_ms } => {
                CurvatureError::EvaluationTimeout { elapsed_ms, limit_ms }
            }
        }
    }
}
