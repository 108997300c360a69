//! Unified error surface for gradient fusion and step orchestration.
//!
//! This module defines `HybridError`, the single error type a step caller
//! sees. It carries the fusion/orchestrator configuration and input
//! failures directly and flattens the capability-level (`SourceError`) and
//! controller-level (`BatchError`) classes into matching variants, so
//! downstream code never handles backend- or module-specific enums. An
//! alias `HybridResult<T>` standardizes the return type.
use crate::{batching::errors::BatchError, sources::errors::SourceError};

/// Crate-wide result alias for step-level operations.
pub type HybridResult<T> = Result<T, HybridError>;

#[derive(Debug, Clone, PartialEq)]
pub enum HybridError {
    // ---- Configuration ----
    /// Fusion weight base must be finite and non-negative.
    InvalidFusionBase {
        alpha: f64,
        reason: &'static str,
    },

    /// Fast-path correction coefficient must be finite and positive.
    InvalidCorrection {
        beta: f64,
        reason: &'static str,
    },

    /// Learning rate must be finite and positive.
    InvalidLearningRate {
        learning_rate: f64,
        reason: &'static str,
    },

    // ---- Gradients ----
    /// Gradient estimates must cover at least one parameter.
    EmptyGradient,

    /// Gradient lengths disagree with each other or with the parameters.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient entries must be finite.
    NonFiniteGradient {
        index: usize,
        value: f64,
    },

    /// Loss values must be finite.
    NonFiniteLoss {
        value: f64,
    },

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

    // ---- Batch control (flattened) ----
    /// Wrapper for `BatchError::InvalidBounds`.
    InvalidBounds {
        b_min: usize,
        b_max: usize,
    },

    /// Wrapper for `BatchError::InvalidAdaptationRate`.
    InvalidAdaptationRate {
        alpha: f64,
        reason: &'static str,
    },

    /// Wrapper for `BatchError::NonFiniteGradNorm`.
    NonFiniteGradNorm {
        value: f64,
    },
}

impl std::error::Error for HybridError {}

impl std::fmt::Display for HybridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            HybridError::InvalidFusionBase { alpha, reason } => {
                write!(f, "Invalid fusion weight base {alpha}: {reason}")
            }
            HybridError::InvalidCorrection { beta, reason } => {
                write!(f, "Invalid correction coefficient {beta}: {reason}")
            }
            HybridError::InvalidLearningRate { learning_rate, reason } => {
                write!(f, "Invalid learning rate {learning_rate}: {reason}")
            }

            // ---- Gradients ----
            HybridError::EmptyGradient => {
                write!(f, "Gradient estimates must cover at least one parameter")
            }
            HybridError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            HybridError::NonFiniteGradient { index, value } => {
                write!(f, "Invalid gradient at index {index}: {value}, must be finite")
            }
            HybridError::NonFiniteLoss { value } => {
                write!(f, "Invalid loss value {value}: must be finite")
            }

            // ---- Evaluation ----
            HybridError::TransientEvaluation { reason } => {
                write!(f, "Transient evaluation failure: {reason}")
            }
            HybridError::EvaluationTimeout { elapsed_ms, limit_ms } => write!(
                f,
                "Evaluation took {elapsed_ms} ms, exceeding the {limit_ms} ms limit"
            ),

            // ---- Batch control ----
            HybridError::InvalidBounds { b_min, b_max } => {
                write!(f, "Invalid batch bounds [{b_min}, {b_max}]: need 1 <= b_min <= b_max")
            }
            HybridError::InvalidAdaptationRate { alpha, reason } => {
                write!(f, "Invalid adaptation rate {alpha}: {reason}")
            }
            HybridError::NonFiniteGradNorm { value } => {
                write!(f, "Invalid gradient norm {value}: must be finite")
            }
        }
    }
}

impl From<SourceError> for HybridError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Transient { reason } => HybridError::TransientEvaluation { reason },
            SourceError::Timeout { elapsed_ms, limit_ms } => {
                HybridError::EvaluationTimeout { elapsed_ms, limit_ms }
            }
        }
    }
}

impl From<BatchError> for HybridError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::InvalidBounds { b_min, b_max } => {
                HybridError::InvalidBounds { b_min, b_max }
            }
            BatchError::InvalidAdaptationRate { alpha, reason } => {
                HybridError::InvalidAdaptationRate { alpha, reason }
            }
            BatchError::NonFiniteGradNorm { value } => HybridError::NonFiniteGradNorm { value },
            BatchError::NonFiniteLoss { value } => HybridError::NonFiniteLoss { value },
        }
    }
}
