//! Orbits, the layered Earth and a weather balloon

use std::any::Any;

use crate::error::Result;
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{Experiment, ExperimentKind, ExperimentParams, Reading, SimContext};

/// Sun, Earth and Moon as a two-level pivot hierarchy
///
/// The Earth orbits because its pivot spins; the Moon's pivot is parented to
/// the Earth, so its orbit is carried along with no extra bookkeeping.
#[derive(Debug, Clone)]
pub struct SolarSystem {
    /// Degrees
    pub earth_angle: f32,
    pub moon_angle: f32,
    /// Degrees per second
    pub earth_rate: f32,
    pub moon_rate: f32,
}

pub fn build_solar_system(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(SolarSystem {
        earth_angle: 0.0,
        moon_angle: 0.0,
        earth_rate: params.get_or("earth_rate", 10.0)?,
        moon_rate: params.get_or("moon_rate", 50.0)?,
    }))
}

impl Experiment for SolarSystem {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::SolarSystem
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "sun",
            EntityDesc::new(Model::Sphere)
                .at(0.0, 5.0, 0.0)
                .scale(2.0)
                .color(Color::YELLOW),
        )?;
        let earth_pivot = ctx
            .store
            .create("earth_pivot", EntityDesc::new(Model::Empty).at(0.0, 5.0, 0.0))?;
        let earth = ctx.store.create(
            "earth",
            EntityDesc::new(Model::Sphere)
                .at(5.0, 0.0, 0.0)
                .scale(0.8)
                .color(Color::BLUE)
                .parent(earth_pivot),
        )?;
        let moon_pivot = ctx
            .store
            .create("moon_pivot", EntityDesc::new(Model::Empty).parent(earth))?;
        ctx.store.create(
            "moon",
            EntityDesc::new(Model::Sphere)
                .at(1.5, 0.0, 0.0)
                .scale(0.2)
                .color(Color::GRAY)
                .parent(moon_pivot),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.earth_angle = (self.earth_angle + self.earth_rate * dt) % 360.0;
        self.moon_angle = (self.moon_angle + self.moon_rate * dt) % 360.0;

        let earth_pivot = ctx.entity("earth_pivot")?;
        let moon_pivot = ctx.entity("moon_pivot")?;
        let (earth, moon) = (self.earth_angle, self.moon_angle);
        ctx.store
            .update_transform(earth_pivot, |t| t.rotation.y = earth)?;
        ctx.store.update_transform(moon_pivot, |t| t.rotation.y = moon)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("earth_orbit", self.earth_angle, "deg"),
            Reading::new("moon_orbit", self.moon_angle, "deg"),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Crust, mantle and core as nested spheres, inner core pulsing
#[derive(Debug, Clone, Default)]
pub struct EarthStructure {
    pub core_scale: f32,
}

pub const INNER_CORE_SCALE: f32 = 0.3;

pub fn build_earth_structure(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(EarthStructure {
        core_scale: INNER_CORE_SCALE,
    }))
}

impl Experiment for EarthStructure {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::EarthStructure
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let crust = ctx.store.create(
            "crust",
            EntityDesc::new(Model::Sphere)
                .at(0.0, 5.0, 0.0)
                .scale(5.0)
                .color(Color::BROWN.with_alpha(0.5)),
        )?;
        let mut parent = crust;
        for (name, scale, color) in [
            ("mantle", 0.8, Color::ORANGE),
            ("outer_core", 0.6, Color::RED),
            ("inner_core", INNER_CORE_SCALE, Color::YELLOW),
        ] {
            parent = ctx.store.create(
                name,
                EntityDesc::new(Model::Sphere)
                    .scale(scale)
                    .color(color)
                    .parent(parent),
            )?;
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, _dt: f32) -> Result<()> {
        self.core_scale = INNER_CORE_SCALE * (1.0 + ctx.time.sin() * 0.05);
        let core = ctx.entity("inner_core")?;
        let scale = self.core_scale;
        ctx.store.update_transform(core, |t| t.set_uniform_scale(scale))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Weather balloon climbing away from the surface
#[derive(Debug, Clone)]
pub struct Atmosphere {
    pub altitude: f32,
    pub climb_rate: f32,
    pub ceiling: f32,
}

pub fn build_atmosphere(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Atmosphere {
        altitude: 0.0,
        climb_rate: params.positive_or("climb_rate", 0.5)?,
        ceiling: params.positive_or("ceiling", 10.0)?,
    }))
}

impl Experiment for Atmosphere {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Atmosphere
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "earth_surface",
            EntityDesc::new(Model::Sphere)
                .at(0.0, -6.0, 0.0)
                .scale(10.0)
                .color(Color::GREEN),
        )?;
        ctx.store.create(
            "balloon",
            EntityDesc::new(Model::Sphere)
                .scale(0.5)
                .color(Color::WHITE),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if self.altitude >= self.ceiling {
            return Ok(());
        }
        self.altitude = (self.altitude + self.climb_rate * dt).min(self.ceiling);
        if self.altitude >= self.ceiling {
            log::info!("balloon reached {:.1}", self.ceiling);
        }
        let balloon = ctx.entity("balloon")?;
        let altitude = self.altitude;
        ctx.store.update_transform(balloon, |t| t.position.y = altitude)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("altitude", self.altitude, "km")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
