//! Static lab-skills scenes: apparatus, safety equipment, notebook

use std::any::Any;

use crate::error::Result;
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{Experiment, ExperimentKind, ExperimentParams, SimContext};

use super::common::lab_asset;

/// Glassware laid out on the bench for identification
#[derive(Debug, Clone, Default)]
pub struct ApparatusId;

pub fn build_apparatus_id(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(ApparatusId))
}

impl Experiment for ApparatusId {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::ApparatusId
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        for (name, x) in [("beaker", -3.0), ("flask", -1.0), ("test_tube", 1.0)] {
            ctx.store.create(name, lab_asset(name, x, 0.0))?;
        }
        Ok(())
    }

    fn update(&mut self, _ctx: &mut SimContext, _dt: f32) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Extinguisher, goggles and waste bin
#[derive(Debug, Clone, Default)]
pub struct Safety;

pub fn build_safety(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Safety))
}

impl Experiment for Safety {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Safety
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "extinguisher",
            EntityDesc::new(Model::Cylinder)
                .at(-2.0, 2.5, 0.0)
                .scale_xyz(0.3, 0.8, 0.3)
                .color(Color::RED),
        )?;
        ctx.store.create(
            "goggles",
            EntityDesc::new(Model::Cube)
                .at(0.0, 2.3, 0.0)
                .scale_xyz(0.5, 0.3, 0.2)
                .color(Color::AZURE),
        )?;
        ctx.store.create(
            "bin",
            EntityDesc::new(Model::Cube)
                .at(2.0, 0.5, 0.0)
                .color(Color::DARK_GRAY),
        )?;
        Ok(())
    }

    fn update(&mut self, _ctx: &mut SimContext, _dt: f32) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Lab notebook open on the bench
#[derive(Debug, Clone, Default)]
pub struct Workflow;

pub fn build_workflow(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Workflow))
}

impl Experiment for Workflow {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Workflow
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "notebook",
            EntityDesc::new(Model::Cube)
                .at(0.0, 2.0, 0.0)
                .scale_xyz(1.5, 0.1, 2.0)
                .color(Color::WHITE),
        )?;
        Ok(())
    }

    fn update(&mut self, _ctx: &mut SimContext, _dt: f32) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
