//! States of matter and separating mixtures

use std::any::Any;

use crate::error::Result;
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{Experiment, ExperimentKind, ExperimentParams, Reading, SimContext};

use super::common::{layout_rng, lab_asset, scatter, Progress};

/// Physical state of the beaker contents
///
/// Boiling is presentation only: a hot liquid jitters but stays `Liquid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Solid,
    Liquid,
}

pub const MELTING_POINT: f32 = 50.0;
pub const BOILING_POINT: f32 = 100.0;
/// Degrees per second
pub const HEATING_RATE: f32 = 5.0;

const CONTENT_Y: f32 = 0.2;

/// Ice heated over a burner until it melts, then boils
#[derive(Debug, Clone)]
pub struct MeltingBoiling {
    pub temperature: f32,
    pub phase: Phase,
}

pub fn build_melting_boiling(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(MeltingBoiling {
        temperature: params.get_or("temperature", 0.0)?,
        phase: Phase::Solid,
    }))
}

impl MeltingBoiling {
    pub fn is_boiling(&self) -> bool {
        self.phase == Phase::Liquid && self.temperature > BOILING_POINT
    }
}

impl Experiment for MeltingBoiling {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::MeltingBoiling
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let beaker = ctx.store.create("beaker", lab_asset("beaker", 0.0, 0.0))?;
        ctx.store.create(
            "tripod",
            EntityDesc::new(Model::Cube)
                .at(0.0, 1.0, 0.0)
                .scale(2.0)
                .color(Color::GRAY),
        )?;
        ctx.store.create(
            "burner",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 0.5, 0.0)
                .scale_xyz(0.5, 1.0, 0.5)
                .color(Color::BLUE),
        )?;
        ctx.store.create(
            "content",
            EntityDesc::new(Model::Cube)
                .at(0.0, CONTENT_Y, 0.0)
                .scale_xyz(0.8, 0.4, 0.8)
                .color(Color::WHITE)
                .parent(beaker),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.temperature += HEATING_RATE * dt;
        let content = ctx.entity("content")?;

        if self.phase == Phase::Solid && self.temperature > MELTING_POINT {
            self.phase = Phase::Liquid;
            log::info!("melted at {:.1} degrees", self.temperature);
            ctx.store.set_color(content, Color::AZURE.with_alpha(0.3))?;
            ctx.store.update_transform(content, |t| t.scale.y = 0.3)?;
        }

        if self.is_boiling() {
            let y = CONTENT_Y + (ctx.time * 20.0).sin() * 0.01;
            ctx.store.update_transform(content, |t| t.position.y = y)?;
        }
        Ok(())
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("temperature", self.temperature, "C")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Potassium permanganate crystal coloring still water
#[derive(Debug, Clone)]
pub struct Diffusion {
    pub progress: Progress,
}

pub fn build_diffusion(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Diffusion {
        progress: Progress::new(params.positive_or("rate", 0.1)?),
    }))
}

impl Experiment for Diffusion {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Diffusion
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let beaker = ctx.store.create("beaker", lab_asset("beaker", 0.0, 0.0))?;
        ctx.store.create(
            "water",
            EntityDesc::new(Model::Cube)
                .at(0.0, 0.4, 0.0)
                .scale_xyz(0.9, 0.8, 0.9)
                .color(Color::AZURE.with_alpha(0.3))
                .parent(beaker),
        )?;
        ctx.store.create(
            "crystal",
            EntityDesc::new(Model::Sphere)
                .at(0.0, 0.1, 0.0)
                .scale(0.1)
                .color(Color::PURPLE)
                .parent(beaker),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.progress.advance(dt) {
            return Ok(());
        }
        let p = self.progress.value();
        let water = ctx.entity("water")?;
        let crystal = ctx.entity("crystal")?;
        let tint = Color::AZURE
            .with_alpha(0.3)
            .lerp(Color::PURPLE.with_alpha(0.5), p);
        ctx.store.set_color(water, tint)?;
        ctx.store
            .update_transform(crystal, |t| t.set_uniform_scale(0.1 * (1.0 - p)))
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("progress", self.progress.value(), "")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Funnel and filter paper over a beaker
#[derive(Debug, Clone, Default)]
pub struct Filtration;

pub fn build_filtration(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Filtration))
}

impl Experiment for Filtration {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Filtration
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create("beaker_bottom", lab_asset("beaker", 0.0, 0.0))?;
        let funnel = ctx.store.create(
            "funnel",
            EntityDesc::new(Model::Cone)
                .at(0.0, 3.5, 0.0)
                .scale(1.5)
                .rotation(180.0, 0.0, 0.0)
                .color(Color::WHITE.with_alpha(0.5)),
        )?;
        ctx.store.create(
            "filter",
            EntityDesc::new(Model::Cone)
                .scale(0.95)
                .color(Color::WHITE)
                .parent(funnel),
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

/// Salt solution boiled down in an evaporating dish
#[derive(Debug, Clone)]
pub struct Evaporation {
    pub progress: Progress,
}

pub fn build_evaporation(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Evaporation {
        progress: Progress::new(params.positive_or("rate", 0.1)?),
    }))
}

impl Experiment for Evaporation {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Evaporation
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let dish = ctx.store.create(
            "dish",
            EntityDesc::new(Model::Sphere)
                .at(0.0, 2.5, 0.0)
                .scale_xyz(2.0, 0.5, 2.0)
                .color(Color::WHITE),
        )?;
        ctx.store.create(
            "tripod",
            EntityDesc::new(Model::Cube)
                .at(0.0, 1.0, 0.0)
                .scale(2.0)
                .color(Color::GRAY),
        )?;
        ctx.store.create(
            "solution",
            EntityDesc::new(Model::Cube)
                .at(0.0, 0.05, 0.0)
                .scale_xyz(0.8, 0.1, 0.8)
                .color(Color::AZURE.with_alpha(0.5))
                .parent(dish),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.progress.advance(dt) {
            return Ok(());
        }
        let left = 1.0 - self.progress.value();
        let solution = ctx.entity("solution")?;
        ctx.store.update_transform(solution, |t| {
            t.scale.y = 0.1 * left;
            t.position.y = 0.05 * left;
        })?;
        if self.progress.is_complete() {
            log::info!("solution evaporated to dryness");
        }
        Ok(())
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("progress", self.progress.value(), "")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub const SOLUTE_PARTICLES: usize = 10;

/// Salt grains dissolving one by one into water
#[derive(Debug, Clone)]
pub struct Solvent {
    pub progress: Progress,
    /// Grain offsets inside the water, drawn once from the seeded layout
    layout: Vec<(f32, f32)>,
}

pub fn build_solvent(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    let mut rng = layout_rng(params)?;
    let layout = (0..SOLUTE_PARTICLES)
        .map(|_| (scatter(&mut rng, 0.4), scatter(&mut rng, 0.4)))
        .collect();
    Ok(Box::new(Solvent {
        progress: Progress::new(params.positive_or("rate", 0.2)?),
        layout,
    }))
}

impl Solvent {
    /// Grains still visible
    pub fn undissolved(&self) -> usize {
        let p = self.progress.value();
        (0..SOLUTE_PARTICLES)
            .filter(|&i| p <= i as f32 / SOLUTE_PARTICLES as f32)
            .count()
    }
}

impl Experiment for Solvent {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Solvent
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let beaker = ctx.store.create("beaker", lab_asset("beaker", 0.0, 0.0))?;
        let water = ctx.store.create(
            "water",
            EntityDesc::new(Model::Cube)
                .at(0.0, 0.4, 0.0)
                .scale_xyz(0.9, 0.8, 0.9)
                .color(Color::AZURE.with_alpha(0.3))
                .parent(beaker),
        )?;
        for (i, &(x, z)) in self.layout.iter().enumerate() {
            ctx.store.create(
                &format!("particle_{}", i),
                EntityDesc::new(Model::Cube)
                    .at(x, 0.4, z)
                    .scale(0.05)
                    .color(Color::WHITE)
                    .parent(water),
            )?;
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.progress.advance(dt) {
            return Ok(());
        }
        let p = self.progress.value();
        for i in 0..SOLUTE_PARTICLES {
            if p > i as f32 / SOLUTE_PARTICLES as f32 {
                let particle = ctx.entity(&format!("particle_{}", i))?;
                ctx.store.set_enabled(particle, false)?;
            }
        }
        if self.progress.is_complete() {
            let water = ctx.entity("water")?;
            ctx.store.set_color(water, Color::WHITE.with_alpha(0.5))?;
            log::info!("solute fully dissolved");
        }
        Ok(())
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("undissolved", self.undissolved() as f32, "")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Dirty water clearing as it trickles through charcoal, gravel and sand
#[derive(Debug, Clone)]
pub struct WaterFiltration {
    pub progress: Progress,
}

pub const CLEAN_WATER: Color = Color::AZURE.with_alpha(0.3);

pub fn build_water_filtration(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(WaterFiltration {
        progress: Progress::new(params.positive_or("rate", 0.1)?),
    }))
}

impl Experiment for WaterFiltration {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::WaterFiltration
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let container = ctx.store.create(
            "container",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 5.0, 0.0)
                .scale_xyz(2.0, 6.0, 2.0)
                .color(Color::WHITE.with_alpha(0.3)),
        )?;
        for (name, y, color) in [
            ("charcoal", -0.3, Color::BLACK),
            ("gravel", -0.1, Color::GRAY),
            ("sand", 0.1, Color::YELLOW),
        ] {
            ctx.store.create(
                name,
                EntityDesc::new(Model::Cube)
                    .at(0.0, y, 0.0)
                    .scale_xyz(0.9, 0.1, 0.9)
                    .color(color)
                    .parent(container),
            )?;
        }
        ctx.store.create(
            "dirty_water",
            EntityDesc::new(Model::Cube)
                .at(0.0, 0.3, 0.0)
                .scale_xyz(0.9, 0.2, 0.9)
                .color(Color::BROWN)
                .parent(container),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.progress.advance(dt) {
            return Ok(());
        }
        let water = ctx.entity("dirty_water")?;
        let color = Color::BROWN.lerp(CLEAN_WATER, self.progress.value());
        ctx.store.set_color(water, color)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("progress", self.progress.value(), "")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
