//! Pendulum, Ohm's law and thin-lens calculators

use std::f32::consts::PI;

use crate::error::{LabError, Result};

/// Duration covered by [`pendulum_trace`]
pub const TRACE_DURATION: f32 = 10.0;

pub const DEFAULT_TRACE_SAMPLES: usize = 1000;

fn require_positive(name: &str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LabError::invalid_parameter(
            name,
            format!("{} must be finite and greater than zero", value),
        ))
    }
}

/// Small-angle period `2π·√(L/g)` in seconds
pub fn pendulum_period(length: f32, gravity: f32) -> Result<f32> {
    let length = require_positive("length", length)?;
    let gravity = require_positive("gravity", gravity)?;
    Ok(2.0 * PI * (length / gravity).sqrt())
}

/// Sampled small-angle solution of a pendulum released from rest
#[derive(Debug, Clone, PartialEq)]
pub struct PendulumTrace {
    pub time: Vec<f32>,
    /// Radians
    pub angle: Vec<f32>,
    /// Bob position relative to the pivot
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub period: f32,
}

/// `θ(t) = θ₀·cos(√(g/L)·t)` over `[0, 10]` seconds, endpoints included
pub fn pendulum_trace(
    length: f32,
    amplitude_deg: f32,
    gravity: f32,
    samples: usize,
) -> Result<PendulumTrace> {
    let period = pendulum_period(length, gravity)?;
    if !amplitude_deg.is_finite() {
        return Err(LabError::invalid_parameter(
            "angle",
            format!("{} is not finite", amplitude_deg),
        ));
    }
    if samples < 2 {
        return Err(LabError::invalid_parameter(
            "samples",
            format!("{} is fewer than two samples", samples),
        ));
    }

    let omega = (gravity / length).sqrt();
    let amplitude = amplitude_deg.to_radians();
    let step = TRACE_DURATION / (samples - 1) as f32;

    let time: Vec<f32> = (0..samples).map(|i| i as f32 * step).collect();
    let angle: Vec<f32> = time.iter().map(|t| amplitude * (omega * t).cos()).collect();
    let x = angle.iter().map(|a| length * a.sin()).collect();
    let y = angle.iter().map(|a| -length * a.cos()).collect();

    Ok(PendulumTrace {
        time,
        angle,
        x,
        y,
        period,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircuitSolution {
    pub voltage: f32,
    pub resistance: f32,
    pub current: f32,
    pub power: f32,
}

/// `I = V/R`, `P = V·I`
pub fn ohms_law(voltage: f32, resistance: f32) -> Result<CircuitSolution> {
    if !voltage.is_finite() {
        return Err(LabError::invalid_parameter(
            "voltage",
            format!("{} is not finite", voltage),
        ));
    }
    let resistance = require_positive("resistance", resistance)?;
    let current = voltage / resistance;
    Ok(CircuitSolution {
        voltage,
        resistance,
        current,
        power: voltage * current,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensImage {
    pub focal_length: f32,
    pub object_distance: f32,
    pub image_distance: f32,
    pub magnification: f32,
}

/// Thin lens equation `1/f = 1/u + 1/v`
///
/// An object placed exactly at the focal point forms no image.
pub fn thin_lens(focal_length: f32, object_distance: f32) -> Result<LensImage> {
    let focal_length = require_positive("focal_length", focal_length)?;
    let object_distance = require_positive("object_distance", object_distance)?;
    if object_distance == focal_length {
        return Err(LabError::invalid_parameter(
            "object_distance",
            "object at the focal length forms no image",
        ));
    }

    let image_distance = 1.0 / (1.0 / focal_length - 1.0 / object_distance);
    Ok(LensImage {
        focal_length,
        object_distance,
        image_distance,
        magnification: -image_distance / object_distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_of_one_meter_pendulum() {
        let period = pendulum_period(1.0, 9.81).unwrap();
        assert!((period - 2.006).abs() < 1e-3);
        assert!(pendulum_period(0.0, 9.81).is_err());
    }

    #[test]
    fn test_trace_endpoints() {
        let trace = pendulum_trace(1.0, 30.0, 9.81, DEFAULT_TRACE_SAMPLES).unwrap();
        assert_eq!(trace.time.len(), 1000);
        assert_eq!(trace.time[0], 0.0);
        assert!((trace.time[999] - 10.0).abs() < 1e-4);
        assert!((trace.angle[0] - 30f32.to_radians()).abs() < 1e-6);
        assert!((trace.y[0] + 30f32.to_radians().cos()).abs() < 1e-6);
        assert!(pendulum_trace(1.0, 30.0, 9.81, 1).is_err());
    }

    #[test]
    fn test_ohms_law() {
        let circuit = ohms_law(12.0, 10.0).unwrap();
        assert!((circuit.current - 1.2).abs() < 1e-6);
        assert!((circuit.power - 14.4).abs() < 1e-5);
        assert!(matches!(
            ohms_law(12.0, 0.0),
            Err(LabError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_real_image_beyond_focal_point() {
        let image = thin_lens(10.0, 15.0).unwrap();
        assert!((image.image_distance - 30.0).abs() < 1e-3);
        assert!((image.magnification + 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_object_at_focal_length() {
        let err = thin_lens(10.0, 10.0).unwrap_err();
        assert!(matches!(err, LabError::InvalidParameter { ref name, .. } if name == "object_distance"));
    }
}
