//! sources — evaluation capabilities consumed by the numerical core.
//!
//! Purpose
//! -------
//! Define the boundary between the core and the external measurement and
//! gradient backends: the [`ObservableSource`] and [`GradientSource`]
//! traits, the tagged [`GradientEstimate`] they feed into the step
//! pipeline, the transient [`SourceError`] class, and the [`CancelToken`]
//! used to abort long evaluation sweeps cooperatively.
//!
//! Key behaviors
//! -------------
//! - Model backends as polymorphic single-method capabilities; the core
//!   never downcasts or inspects the concrete type.
//! - Classify every backend failure as transient and leave retry policy
//!   (count, backoff) to the caller.
//! - Provide closure blanket impls so tests and small adapters need no
//!   wrapper types.
//!
//! Invariants & assumptions
//! ------------------------
//! - Backends never retain or mutate the parameter vectors they receive.
//! - An observable backend returns vectors of one fixed, agreed length per
//!   configuration.
//! - Stochastic backends own explicitly seeded randomness; nothing in this
//!   crate reads ambient RNG state.
//!
//! Downstream usage
//! ----------------
//! - `curvature` probes an [`ObservableSource`] for finite-difference
//!   Fisher estimation and honors [`CancelToken`] between probes.
//! - `hybrid` evaluates two [`GradientSource`] backends per step and tags
//!   their outputs as [`GradientEstimate`]s before fusion.

pub mod cancel;
pub mod errors;
pub mod traits;

// ---- Re-exports (primary public surface) -----------------------------------

pub use self::cancel::CancelToken;
pub use self::errors::{SourceError, SourceResult};
pub use self::traits::{
    GradientEstimate, GradientPath, GradientSource, ObservableSource, Precision,
};

// ---- Optional convenience prelude for downstream crates --------------------
//
// Downstream crates can write
//
//     use hybrid_natgrad::sources::prelude::*;
//
// to import the capability surface in a single line.

pub mod prelude {
    pub use super::cancel::CancelToken;
    pub use super::errors::{SourceError, SourceResult};
    pub use super::traits::{
        GradientEstimate, GradientPath, GradientSource, ObservableSource, Precision,
    };
}
