//! Unified error handling for evaluation capabilities.
//!
//! This module defines `SourceError`, the error type used by observable and
//! gradient backends. It represents the *transient* evaluation class: every
//! variant describes a failure of a single blocking evaluation that a caller
//! may choose to retry. Retry policy (count, backoff) is owned entirely by
//! the caller; the core never retries on its own. An alias
//! `SourceResult<T>` standardizes the return type across capability code.

/// Error raised by an observable or gradient backend during one evaluation.
///
/// Both variants belong to the retryable class reported by
/// [`SourceError::is_transient`]. Arbitrary backend errors integrate via
/// `From<anyhow::Error>`, which maps them onto [`SourceError::Transient`].
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Backend evaluation failed in a way that may succeed on retry
    /// (backend unavailable, queue full, lost connection, ...).
    Transient {
        reason: String,
    },

    /// A blocking evaluation overran its configured time limit.
    Timeout {
        elapsed_ms: u64,
        limit_ms: u64,
    },
}

pub type SourceResult<T> = Result<T, SourceError>;

impl SourceError {
    /// Whether a caller-owned retry policy may reasonably re-attempt the
    /// evaluation. Currently true for every variant; the method exists so
    /// call sites stay correct if a non-retryable variant is ever added.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Transient { .. } | SourceError::Timeout { .. } => true,
        }
    }
}

impl From<anyhow::Error> for SourceError {
    fn from(err: anyhow::Error) -> Self {
        SourceError::Transient { reason: err.to_string() }
    }
}

impl std::error::Error for SourceError {}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Transient { reason } => {
                write!(f, "Source Error: Transient evaluation failure: {}", reason)
            }
            SourceError::Timeout { elapsed_ms, limit_ms } => write!(
                f,
                "Source Error: Evaluation took {} ms, exceeding the {} ms limit",
                elapsed_ms, limit_ms
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Transience classification of each variant.
    // - The anyhow catchall conversion.
    //
    // They intentionally DO NOT cover:
    // - Retry behavior, which is owned by callers, not this crate.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that both variants report themselves as retryable.
    //
    // Given
    // -----
    // - A `Transient` error and a `Timeout` error.
    //
    // Expect
    // ------
    // - `is_transient()` returns `true` for both.
    fn every_source_error_variant_is_transient() {
        // Arrange
        let transient = SourceError::Transient { reason: "backend offline".to_string() };
        let timeout = SourceError::Timeout { elapsed_ms: 1200, limit_ms: 1000 };

        // Assert
        assert!(transient.is_transient());
        assert!(timeout.is_transient());
    }

    #[test]
    // Purpose
    // -------
    // Ensure that an arbitrary `anyhow::Error` maps onto the `Transient`
    // variant with its message preserved.
    //
    // Given
    // -----
    // - An `anyhow::Error` built from a plain message.
    //
    // Expect
    // ------
    // - The converted `SourceError` is `Transient` and carries the message.
    fn anyhow_errors_convert_to_transient() {
        // Arrange
        let backend_err = anyhow::anyhow!("device queue saturated");

        // Act
        let converted: SourceError = backend_err.into();

        // Assert
        match converted {
            SourceError::Transient { reason } => assert!(reason.contains("queue saturated")),
            other => panic!("Expected Transient, got {other:?}"),
        }
    }
}
