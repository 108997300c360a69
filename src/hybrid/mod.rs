//! hybrid — gradient fusion and step orchestration over two computation paths.
//!
//! Purpose
//! -------
//! Merge the gradients of a fast/reduced-stability path and a slow/stable
//! path into one update direction and drive the per-step loop around that
//! merge: precision correction, descent update, batch-size feedback, and
//! diagnostics.
//!
//! Key behaviors
//! -------------
//! - Adaptive fusion weight from a cheap curvature proxy on the primary
//!   estimate ([`fusion`]).
//! - One-call optimization step over two
//!   [`GradientSource`](crate::sources::GradientSource) backends,
//!   including the owned batch-controller query ([`orchestrator`]).
//! - A single flattened error surface for step callers ([`errors`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Fusion is a pure function; the orchestrator retains no per-step state
//!   beyond its backends, options, and controller.
//! - The fusion weight is intentionally not clamped to [0, 1]; see the
//!   fusion module docs for the regime where it exceeds 1.
//!
//! Downstream usage
//! ----------------
//! - Construct a [`HybridStepOrchestrator`] with validated
//!   [`HybridOptions`] and batch options, then call
//!   [`HybridStepOrchestrator::step`] per optimization step, feeding
//!   [`StepMetrics::next_batch_size`] back into the measurement backend.

pub mod errors;
pub mod fusion;
pub mod orchestrator;

// ---- Re-exports (primary public surface) -----------------------------------

pub use self::errors::{HybridError, HybridResult};
pub use self::fusion::merge;
pub use self::orchestrator::{HybridOptions, HybridStepOrchestrator, StepMetrics};

// ---- Optional convenience prelude for downstream crates --------------------
//
// Downstream crates can write
//
//     use hybrid_natgrad::hybrid::prelude::*;
//
// to import the step surface in a single line.

pub mod prelude {
    pub use super::errors::{HybridError, HybridResult};
    pub use super::fusion::merge;
    pub use super::orchestrator::{HybridOptions, HybridStepOrchestrator, StepMetrics};
}
