//! Core experiment traits for the lab engine
//!
//! Defines the two-behavior contract every experiment kind implements so that a
//! [`Session`](super::session::Session) can drive it without knowing its state.

use std::any::Any;

use crate::error::Result;
use crate::scene::{EntityHandle, EntityStore};

use super::kind::ExperimentKind;

/// What an experiment sees while running: its session's entities and clock
pub struct SimContext<'a> {
    pub store: &'a mut EntityStore,
    /// Session elapsed time in seconds, including the current step
    pub time: f32,
}

impl<'a> SimContext<'a> {
    pub fn new(store: &'a mut EntityStore, time: f32) -> Self {
        Self { store, time }
    }

    /// Handle of an entity created during setup
    ///
    /// A missing name means setup and update disagree, so this fails fast with
    /// `NotFound` instead of skipping the write.
    pub fn entity(&self, name: &str) -> Result<EntityHandle> {
        self.store.handle(name)
    }
}

/// External control signal forwarded by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    Start,
    Stop,
}

/// Labeled numeric readout of experiment state, for host display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub label: &'static str,
    pub value: f32,
    pub unit: &'static str,
}

impl Reading {
    pub fn new(label: &'static str, value: f32, unit: &'static str) -> Self {
        Self { label, value, unit }
    }
}

/// Per-kind simulation module
///
/// Each implementor owns a strongly-typed state struct. Visuals are re-derived
/// from that state on every update; no visual error is accumulated frame over
/// frame.
pub trait Experiment {
    fn kind(&self) -> ExperimentKind;

    /// Create entities and initialize state
    ///
    /// Called exactly once, against a fresh store.
    fn setup(&mut self, ctx: &mut SimContext) -> Result<()>;

    /// Advance state by `dt` seconds, then write the derived entity values
    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()>;

    /// Handle an external start/stop signal
    ///
    /// Returns `true` if this kind reacts to the signal.
    fn handle_signal(&mut self, _signal: ControlSignal) -> bool {
        false
    }

    /// Current readouts, empty for purely visual kinds
    fn readings(&self) -> Vec<Reading> {
        Vec::new()
    }

    /// Downcast support for hosts and tests that know the concrete kind
    fn as_any(&self) -> &dyn Any;
}
