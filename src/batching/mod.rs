//! batching — adaptive sample-size control for the measurement process.
//!
//! Purpose
//! -------
//! Decide, step by step, how many samples the measurement backend should
//! take next. Shot noise shrinks with sample count, so the controller
//! trades wall-clock cost against estimate quality using short rolling
//! statistics of the optimization run itself.
//!
//! Key behaviors
//! -------------
//! - Follow a fixed linear warmup schedule before any feedback control
//!   ([`controller`]).
//! - Adapt within validated bounds from the current gradient norm and the
//!   recent gradient-norm variance.
//! - Keep all run statistics in bounded ring buffers ([`history`]) with an
//!   explicit reset as the only deletion path.
//!
//! Invariants & assumptions
//! ------------------------
//! - Returned batch sizes always lie within `[b_min, b_max]` inclusive.
//! - Controller state is owner-mutated only; overlapping steps must
//!   serialize calls or own independent controllers.
//!
//! Downstream usage
//! ----------------
//! - The hybrid step orchestrator owns one controller and queries it each
//!   step; callers feed the returned size back into their measurement
//!   backend.

pub mod controller;
pub mod errors;
pub mod history;

// ---- Re-exports (primary public surface) -----------------------------------

pub use self::controller::{
    BatchMetrics, BatchOptions, BatchSizeController, REPORT_WINDOW, VARIANCE_WINDOW,
};
pub use self::errors::{BatchError, BatchResult};
pub use self::history::RollingWindow;

// ---- Optional convenience prelude for downstream crates --------------------
//
// Downstream crates can write
//
//     use hybrid_natgrad::batching::prelude::*;
//
// to import the batching surface in a single line.

pub mod prelude {
    pub use super::controller::{BatchMetrics, BatchOptions, BatchSizeController};
    pub use super::errors::{BatchError, BatchResult};
}
