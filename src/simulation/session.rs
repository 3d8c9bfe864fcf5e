//! Simulation session
//!
//! One running instance of an experiment kind: its module, its entities, its
//! clock and its lifecycle. The host owns the frame loop and calls
//! [`Session::tick`] synchronously; the session never reads a clock itself.

use crate::error::{LabError, Result};
use crate::projection::VisualProjection;
use crate::scene::EntityStore;

use super::{
    kind::ExperimentKind,
    settings::SessionSettings,
    traits::{ControlSignal, Experiment, Reading, SimContext},
};

/// Lifecycle state; disposal consumes the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, no entities yet
    Created,
    Running,
    Paused,
}

/// Drives one experiment module over time
pub struct Session {
    experiment: Box<dyn Experiment>,
    store: EntityStore,
    state: SessionState,
    settings: SessionSettings,
    elapsed_time: f32,
    accumulated_time: f32, // fixed timestep remainder
    step_count: u64,
}

impl Session {
    pub(crate) fn new(experiment: Box<dyn Experiment>, settings: SessionSettings) -> Self {
        Self {
            experiment,
            store: EntityStore::new(),
            state: SessionState::Created,
            settings,
            elapsed_time: 0.0,
            accumulated_time: 0.0,
            step_count: 0,
        }
    }

    /// Run the kind's setup exactly once, moving `Created -> Running`
    pub fn setup(&mut self) -> Result<()> {
        if self.state != SessionState::Created {
            return Err(LabError::InvalidState {
                operation: "set up",
                state: self.state,
            });
        }

        let mut ctx = SimContext::new(&mut self.store, 0.0);
        if let Err(err) = self.experiment.setup(&mut ctx) {
            // Partial entities would collide with a retry
            self.store = EntityStore::new();
            log::warn!("experiment `{}` failed to set up: {}", self.kind(), err);
            return Err(err);
        }
        self.state = SessionState::Running;

        log::info!(
            "experiment `{}` set up with {} entities",
            self.kind(),
            self.store.len()
        );
        Ok(())
    }

    /// Advance the session by a host-supplied `dt` in seconds
    ///
    /// A no-op while paused. Fails before setup, and for negative or
    /// non-finite `dt`.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(LabError::invalid_parameter(
                "dt",
                format!("{} must be finite and >= 0", dt),
            ));
        }

        match self.state {
            SessionState::Created => Err(LabError::InvalidState {
                operation: "tick",
                state: self.state,
            }),
            SessionState::Paused => Ok(()),
            SessionState::Running => {
                let scaled = dt * self.settings.time_scale;
                match self.settings.fixed_timestep {
                    Some(step) => self.run_fixed(scaled, step),
                    None => self.step(scaled),
                }
            }
        }
    }

    fn run_fixed(&mut self, scaled: f32, step: f32) -> Result<()> {
        self.accumulated_time += scaled;

        let mut substeps = 0;
        while self.accumulated_time >= step {
            if substeps == self.settings.max_substeps {
                log::warn!(
                    "experiment `{}` fell behind by {:.3}s; dropping remainder",
                    self.kind(),
                    self.accumulated_time
                );
                self.accumulated_time = 0.0;
                break;
            }
            self.step(step)?;
            self.accumulated_time -= step;
            substeps += 1;
        }
        Ok(())
    }

    fn step(&mut self, dt: f32) -> Result<()> {
        self.elapsed_time += dt;
        self.step_count += 1;
        let mut ctx = SimContext::new(&mut self.store, self.elapsed_time);
        self.experiment.update(&mut ctx, dt)
    }

    /// Pause or resume; never re-runs setup
    ///
    /// Pausing leaves the last computed visuals in place.
    pub fn set_running(&mut self, running: bool) -> Result<()> {
        let next = match (self.state, running) {
            (SessionState::Created, _) => {
                return Err(LabError::InvalidState {
                    operation: if running { "resume" } else { "pause" },
                    state: self.state,
                })
            }
            (_, true) => SessionState::Running,
            (_, false) => SessionState::Paused,
        };
        if next != self.state {
            log::info!("experiment `{}` now {:?}", self.kind(), next);
            self.state = next;
        }
        Ok(())
    }

    /// Forward an external start/stop signal to the experiment
    ///
    /// Returns whether the kind reacts to signals at all.
    pub fn signal(&mut self, signal: ControlSignal) -> Result<bool> {
        if self.state == SessionState::Created {
            return Err(LabError::InvalidState {
                operation: "signal",
                state: self.state,
            });
        }
        Ok(self.experiment.handle_signal(signal))
    }

    /// Release the session and every entity it owns
    pub fn dispose(self) {
        log::info!(
            "experiment `{}` disposed after {:.2}s ({} steps)",
            self.kind(),
            self.elapsed_time,
            self.step_count
        );
    }

    pub fn kind(&self) -> ExperimentKind {
        self.experiment.kind()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Read-only view handed to the renderer each frame
    pub fn projection(&self) -> VisualProjection<'_> {
        VisualProjection::new(&self.store)
    }

    pub fn readings(&self) -> Vec<Reading> {
        self.experiment.readings()
    }

    /// Look up one reading by label
    pub fn reading(&self, label: &str) -> Option<f32> {
        self.readings()
            .into_iter()
            .find(|r| r.label == label)
            .map(|r| r.value)
    }

    /// Concrete experiment state, when the caller knows the kind
    pub fn experiment<T: 'static>(&self) -> Option<&T> {
        self.experiment.as_any().downcast_ref::<T>()
    }
}
