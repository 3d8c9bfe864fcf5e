//! # Labsim Prelude
//!
//! Commonly used types and traits in one import, for hosts driving sessions
//! and for experiment modules alike.
//!
//! ## Usage
//!
//! ```no_run
//! use labsim::prelude::*;
//!
//! fn main() -> Result<(), LabError> {
//!     let mut session = registry().launch(ExperimentKind::FreeFall, &ExperimentParams::new())?;
//!     session.signal(ControlSignal::Start)?;
//!
//!     for _ in 0..120 {
//!         session.tick(1.0 / 60.0)?;
//!     }
//!     for view in session.projection().snapshot()? {
//!         println!("{:>12} {:?}", view.name, view.position);
//!     }
//!     Ok(())
//! }
//! ```

// Re-export errors
pub use crate::error::LabError;

// Re-export scene types
pub use crate::scene::{Color, Entity, EntityDesc, EntityHandle, EntityStore, Model, Transform};

// Re-export simulation framework
pub use crate::simulation::{
    registry, ControlSignal, Domain, Experiment, ExperimentKind, ExperimentParams, Reading,
    Registry, Session, SessionSettings, SessionState, SimContext,
};

// Re-export projection types
pub use crate::projection::{
    resolve_mesh, EntityView, InstanceData, MeshChoice, MeshLookup, VisualProjection,
};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3};
