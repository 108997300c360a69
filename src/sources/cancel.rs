//! Cooperative cancellation for long evaluation sweeps.
//!
//! A [`CancelToken`] is a cheaply clonable flag shared between the caller
//! and a running finite-difference sweep. The sweep checks the token
//! between independent evaluations and aborts without returning partial
//! results; it never interrupts a blocking backend call that is already in
//! flight.
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared cancellation flag.
///
/// Clones observe the same underlying flag. Once cancelled, a token stays
/// cancelled; there is no reset, so a fresh sweep should use a fresh token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Visible to every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
