// src/lib.rs
//! Labsim Experiment Engine
//!
//! A renderer-agnostic virtual science lab. Each experiment kind owns a typed
//! state and a set of named entities; a [`Session`] advances it tick by tick
//! and a [`VisualProjection`](projection::VisualProjection) hands the resulting
//! transforms and colors to whatever renders them.

pub mod calculators;
pub mod error;
pub mod experiments;
pub mod prelude;
pub mod projection;
pub mod scene;
pub mod simulation;

// Re-export main types for convenience
pub use error::{LabError, Result};
pub use simulation::{registry, ExperimentKind, ExperimentParams, Session};

/// Launches `kind` from the standard registry with default parameters
pub fn launch(kind: ExperimentKind) -> Result<Session> {
    registry().launch(kind, &ExperimentParams::new())
}
