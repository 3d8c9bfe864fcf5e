//! Session timing settings

use crate::error::{LabError, Result};

/// How a session converts host-supplied `dt` into simulation steps
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    /// Multiplier applied to every host `dt` (1.0 = real time)
    pub time_scale: f32,
    /// Run whole steps of this size instead of one variable step per tick
    pub fixed_timestep: Option<f32>,
    /// Upper bound on fixed sub-steps per tick, so a stalled host cannot make
    /// one tick arbitrarily long
    pub max_substeps: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: None,
            max_substeps: 240,
        }
    }
}

impl SessionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Deterministic stepping, e.g. `Some(1.0 / 60.0)`
    pub fn with_fixed_timestep(mut self, timestep: Option<f32>) -> Self {
        self.fixed_timestep = timestep;
        self
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(LabError::invalid_parameter(
                "time_scale",
                format!("{} must be finite and >= 0", self.time_scale),
            ));
        }
        if let Some(step) = self.fixed_timestep {
            if !step.is_finite() || step <= 0.0 {
                return Err(LabError::invalid_parameter(
                    "fixed_timestep",
                    format!("{} must be finite and > 0", step),
                ));
            }
        }
        if self.max_substeps == 0 {
            return Err(LabError::invalid_parameter(
                "max_substeps",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
