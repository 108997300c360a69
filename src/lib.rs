//! hybrid_natgrad — curvature-aware gradients for sample-limited measurement processes.
//!
//! Purpose
//! -------
//! Serve as the crate root for the three numerical subsystems used to
//! optimize a parameter vector that drives a stochastic, shot-limited
//! measurement process:
//! - **curvature**: a finite-difference Fisher-information estimator and a
//!   damped natural-gradient solver;
//! - **batching**: an adaptive sample-size controller driven by rolling
//!   gradient statistics;
//! - **hybrid**: a fusion engine merging a fast/reduced-precision gradient
//!   path with a slow/stable one, and the orchestrator that turns the pair
//!   into a single optimization step.
//!
//! Key behaviors
//! -------------
//! - Consume measurement and gradient backends exclusively through the
//!   capability traits in [`sources`]; the core never inspects concrete
//!   backend types.
//! - Validate every configuration knob and every vector at component
//!   boundaries; nothing proceeds on a poisoned value.
//! - Return diagnostics as values ([`hybrid::StepMetrics`],
//!   [`batching::BatchMetrics`], [`curvature::FisherDiagnostics`]); this
//!   crate performs no I/O and no logging.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter, gradient, and observable lengths are fixed per run and
//!   enforced everywhere; silent truncation or padding never happens.
//! - Estimated Fisher matrices are symmetric with non-negative diagonals
//!   by construction.
//! - Backend failures are transient and retryable by caller policy only;
//!   numerical failures of the damped solve are fatal for the step.
//!
//! Conventions
//! -----------
//! - All numeric containers are `ndarray` types over `f64` via the
//!   aliases in [`types`]; dense factorizations and eigendecompositions
//!   run on `nalgebra` matrices behind an explicit bridge.
//! - Checkpointing, persistence, CLI, and configuration loading belong to
//!   the surrounding harness, not this crate.
//!
//! Downstream usage
//! ----------------
//! - Implement [`sources::ObservableSource`] over the measurement backend
//!   and feed it to a [`curvature::FisherEstimator`].
//! - Implement [`sources::GradientSource`] twice (fast and stable paths)
//!   and drive a [`hybrid::HybridStepOrchestrator`] per step, feeding its
//!   reported batch size back into the measurement backend.
//!
//! Testing notes
//! -------------
//! - Unit tests live in `#[cfg(test)]` modules next to the code they
//!   cover; `tests/integration_hybrid_pipeline.rs` exercises the full
//!   estimate → solve → fuse → descend → adapt loop on analytic and
//!   seeded stochastic backends.

pub mod batching;
pub mod curvature;
pub mod hybrid;
pub mod sources;
pub mod types;

// ---- Optional convenience prelude for downstream crates --------------------
//
// Downstream crates can write
//
//     use hybrid_natgrad::prelude::*;
//
// to import the main crate surface in a single line.

pub mod prelude {
    pub use crate::batching::prelude::*;
    pub use crate::curvature::prelude::*;
    pub use crate::hybrid::prelude::*;
    pub use crate::sources::prelude::*;
    pub use crate::types::{
        DEFAULT_DAMPING, DEFAULT_EPSILON, FisherMatrix, Grad, Observable, Params,
    };
}
