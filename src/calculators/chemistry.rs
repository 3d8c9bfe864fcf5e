//! Acid-base titration curve and temperature-scaled reaction rate

use std::cmp::Ordering;

use crate::error::{LabError, Result};

/// Reference temperature for [`reaction_rate`], in kelvin
pub const ROOM_TEMPERATURE: f32 = 298.0;

/// Rate at [`ROOM_TEMPERATURE`]
pub const BASE_RATE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitrationPoint {
    /// Base added so far, mL
    pub volume: f32,
    pub ph: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitrationCurve {
    /// Base volume that exactly neutralizes the acid, mL
    pub equivalence_volume: f32,
    pub points: Vec<TitrationPoint>,
}

impl TitrationCurve {
    /// First sampled volume at which the solution is no longer acidic
    pub fn first_neutral_volume(&self) -> Option<f32> {
        self.points
            .iter()
            .find(|point| point.ph >= 7.0)
            .map(|point| point.volume)
    }
}

/// Fewest samples taken up to the equivalence point
pub const MIN_HALF_SAMPLES: usize = 10;
/// Upper bound on the number of points in one curve
pub const MAX_POINTS: usize = 1000;

/// Strong monoprotic acid titrated with a strong base
///
/// Concentrations in mol/L, volumes in mL. Points are evenly spaced from zero
/// up to, but excluding, twice the equivalence volume, one per whole millilitre
/// when the equivalence volume is a whole number between
/// [`MIN_HALF_SAMPLES`] and `MAX_POINTS / 2`. The equivalence point itself is
/// always sampled.
pub fn titration_curve(
    acid_concentration: f32,
    acid_volume: f32,
    base_concentration: f32,
) -> Result<TitrationCurve> {
    for (name, value) in [
        ("acid_concentration", acid_concentration),
        ("acid_volume", acid_volume),
        ("base_concentration", base_concentration),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(LabError::invalid_parameter(
                name,
                format!("{} must be finite and greater than zero", value),
            ));
        }
    }

    let acid = acid_concentration * acid_volume;
    let equivalence_volume = acid / base_concentration;
    if !(equivalence_volume.is_finite() && equivalence_volume > 0.0) {
        return Err(LabError::invalid_parameter(
            "equivalence_volume",
            format!("{} mL is out of range", equivalence_volume),
        ));
    }

    let half = equivalence_volume
        .round()
        .clamp(MIN_HALF_SAMPLES as f32, (MAX_POINTS / 2) as f32) as usize;

    let points = (0..2 * half)
        .map(|k| {
            let volume = equivalence_volume * k as f32 / half as f32;
            let total = acid_volume + volume;
            // Excess moles from the sample index, free of cancellation near equivalence
            let excess = acid * k.abs_diff(half) as f32 / half as f32;
            let ph = match k.cmp(&half) {
                Ordering::Less => -(excess / total).log10(),
                Ordering::Greater => 14.0 + (excess / total).log10(),
                Ordering::Equal => 7.0,
            };
            TitrationPoint {
                volume,
                ph: ph.clamp(0.0, 14.0),
            }
        })
        .collect();

    Ok(TitrationCurve {
        equivalence_volume,
        points,
    })
}

/// Linear temperature scaling of [`BASE_RATE`]
pub fn reaction_rate(temperature: f32) -> Result<f32> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(LabError::invalid_parameter(
            "temperature",
            format!("{} K is not an absolute temperature", temperature),
        ));
    }
    Ok(BASE_RATE * (temperature / ROOM_TEMPERATURE))
}
