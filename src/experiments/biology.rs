//! Animal cell and DNA double helix

use std::any::Any;
use std::f32::consts::PI;

use cgmath::Vector3;

use crate::error::Result;
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{Experiment, ExperimentKind, ExperimentParams, Reading, SimContext};

use super::common::{layout_rng, scatter};

pub const MITOCHONDRIA: usize = 3;
/// Degrees per second
pub const ORGANELLE_SPIN: f32 = 20.0;
/// Radius of the closed loop each mitochondrion drifts around
pub const DRIFT_RADIUS: f32 = 0.06;

/// Cell membrane with a nucleus and drifting mitochondria
#[derive(Debug, Clone)]
pub struct Cell {
    /// Rest positions inside the membrane, drawn from the seeded layout
    anchors: Vec<Vector3<f32>>,
}

pub fn build_cell(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    let mut rng = layout_rng(params)?;
    let anchors = (0..MITOCHONDRIA)
        .map(|_| {
            Vector3::new(
                scatter(&mut rng, 0.4),
                scatter(&mut rng, 0.4),
                scatter(&mut rng, 0.4),
            )
        })
        .collect();
    Ok(Box::new(Cell { anchors }))
}

impl Cell {
    /// Local position of mitochondrion `i` at time `t`
    ///
    /// Traces a circle through the anchor, so the drift never wanders off.
    pub fn organelle_position(&self, i: usize, t: f32) -> Vector3<f32> {
        let phase = i as f32;
        self.anchors[i]
            + Vector3::new(
                phase.cos() - (t + phase).cos(),
                0.0,
                (t + phase).sin() - phase.sin(),
            ) * DRIFT_RADIUS
    }
}

impl Experiment for Cell {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Cell
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let membrane = ctx.store.create(
            "membrane",
            EntityDesc::new(Model::Sphere)
                .at(0.0, 4.5, 0.0)
                .scale(5.0)
                .color(Color::AZURE.with_alpha(0.2)),
        )?;
        ctx.store.create(
            "nucleus",
            EntityDesc::new(Model::Sphere)
                .scale(0.4)
                .color(Color::MAGENTA)
                .parent(membrane),
        )?;
        for (i, anchor) in self.anchors.iter().enumerate() {
            ctx.store.create(
                &format!("mitochondrion_{}", i),
                EntityDesc::new(Model::Sphere)
                    .at(anchor.x, anchor.y, anchor.z)
                    .scale(0.15)
                    .color(Color::ORANGE)
                    .parent(membrane),
            )?;
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, _dt: f32) -> Result<()> {
        let spin = (ctx.time * ORGANELLE_SPIN) % 360.0;
        for i in 0..self.anchors.len() {
            let handle = ctx.entity(&format!("mitochondrion_{}", i))?;
            let position = self.organelle_position(i, ctx.time);
            ctx.store.update_transform(handle, |t| {
                t.position = position;
                t.rotation.y = spin;
            })?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub const HELIX_RUNGS: usize = 20;
pub const RUNG_SPACING: f32 = 0.4;
/// Radians of twist between consecutive rungs
pub const RUNG_TWIST: f32 = 0.5;

/// Double helix of paired bases spinning about its axis
#[derive(Debug, Clone)]
pub struct Dna {
    /// Degrees
    pub angle: f32,
    /// Degrees per second
    pub rotation_speed: f32,
}

pub fn build_dna(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Dna {
        angle: 0.0,
        rotation_speed: params.get_or("rotation_speed", 30.0)?,
    }))
}

impl Experiment for Dna {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Dna
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let center = ctx
            .store
            .create("helix_center", EntityDesc::new(Model::Empty).at(0.0, 4.5, 0.0))?;

        for i in 0..HELIX_RUNGS {
            let y = i as f32 * RUNG_SPACING - 4.0;
            let twist = i as f32 * RUNG_TWIST;

            for (strand, offset, color) in [("strand_a", 0.0, Color::BLUE), ("strand_b", PI, Color::RED)] {
                ctx.store.create(
                    &format!("{}_{}", strand, i),
                    EntityDesc::new(Model::Sphere)
                        .at((twist + offset).cos(), y, (twist + offset).sin())
                        .scale(0.2)
                        .color(color)
                        .parent(center),
                )?;
            }
            ctx.store.create(
                &format!("link_{}", i),
                EntityDesc::new(Model::Cube)
                    .at(0.0, y, 0.0)
                    .scale_xyz(2.0, 0.05, 0.05)
                    .rotation(0.0, -twist.to_degrees(), 0.0)
                    .color(Color::WHITE)
                    .parent(center),
            )?;
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.angle = (self.angle + self.rotation_speed * dt) % 360.0;
        let center = ctx.entity("helix_center")?;
        let angle = self.angle;
        ctx.store.update_transform(center, |t| t.rotation.y = angle)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("rotation", self.angle, "deg")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
