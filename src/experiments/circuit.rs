//! Series circuit: battery, resistor and two wires

use std::any::Any;

use crate::calculators::{ohms_law, CircuitSolution};
use crate::error::Result;
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{Experiment, ExperimentKind, ExperimentParams, Reading, SimContext};

#[derive(Debug, Clone)]
pub struct Circuit {
    pub solution: CircuitSolution,
}

pub fn build(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    let voltage = params.get_or("voltage", 5.0)?;
    let resistance = params.get_or("resistance", 10.0)?;
    Ok(Box::new(Circuit {
        solution: ohms_law(voltage, resistance)?,
    }))
}

impl Experiment for Circuit {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Circuit
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "battery",
            EntityDesc::new(Model::Cube)
                .at(-2.0, 2.5, 0.0)
                .scale_xyz(0.5, 1.0, 0.2)
                .color(Color::RED),
        )?;
        ctx.store.create(
            "resistor",
            EntityDesc::new(Model::Cylinder)
                .at(2.0, 2.5, 0.0)
                .scale_xyz(0.2, 0.5, 0.2)
                .color(Color::ORANGE),
        )?;
        for (name, y) in [("wire1", 3.0), ("wire2", 2.0)] {
            ctx.store.create(
                name,
                EntityDesc::new(Model::Cube)
                    .at(0.0, y, 0.0)
                    .scale_xyz(2.0, 0.05, 0.05)
                    .color(Color::BLACK),
            )?;
        }
        Ok(())
    }

    fn update(&mut self, _ctx: &mut SimContext, _dt: f32) -> Result<()> {
        Ok(())
    }

    fn readings(&self) -> Vec<Reading> {
        let s = &self.solution;
        vec![
            Reading::new("voltage", s.voltage, "V"),
            Reading::new("resistance", s.resistance, "ohm"),
            Reading::new("current", s.current, "A"),
            Reading::new("power", s.power, "W"),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LabError;

    #[test]
    fn test_default_current() {
        let circuit = build(&ExperimentParams::new()).unwrap();
        assert_eq!(circuit.readings()[2], Reading::new("current", 0.5, "A"));
    }

    #[test]
    fn test_zero_resistance_rejected() {
        let result = build(&ExperimentParams::new().with("resistance", 0.0));
        assert!(matches!(result, Err(LabError::InvalidParameter { .. })));
    }
}
