//! Simulation system
//!
//! Experiment kinds, the registry that instantiates them, the session that
//! drives one of them tick by tick, and the parameter/settings intake.

pub mod kind;
pub mod params;
pub mod registry;
pub mod session;
pub mod settings;
pub mod traits;

pub use kind::{Domain, ExperimentKind};
pub use params::ExperimentParams;
pub use registry::{registry, ExperimentFactory, Registry};
pub use session::{Session, SessionState};
pub use settings::SessionSettings;
pub use traits::{ControlSignal, Experiment, Reading, SimContext};
