//! Simple pendulum
//!
//! Nonlinear angular dynamics `α = -(g/L)·sin θ` integrated with semi-implicit
//! Euler and a fixed per-step damping factor standing in for air resistance.
//! Bob and rod are placed from `(L, θ)` every frame relative to a fixed pivot.

use std::any::Any;
use std::f32::consts::FRAC_PI_4;

use cgmath::{InnerSpace, Vector3};

use crate::error::Result;
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{
    Experiment, ExperimentKind, ExperimentParams, Reading, SimContext,
};

/// Applied to the angular velocity after every step; never reaches exact zero
pub const DAMPING: f32 = 0.999;

pub const DEFAULT_LENGTH: f32 = 1.0;
pub const DEFAULT_GRAVITY: f32 = 9.81;

/// Pendulum state
#[derive(Debug, Clone)]
pub struct Pendulum {
    pub length: f32,
    pub angle: f32,
    pub angular_velocity: f32,
    pub gravity: f32,
    pub pivot: Vector3<f32>,
}

impl Pendulum {
    /// `length` in meters, `angle` in degrees from vertical, `gravity` in m/s²
    pub fn from_params(params: &ExperimentParams) -> Result<Self> {
        Ok(Self {
            length: params.positive_or("length", DEFAULT_LENGTH)?,
            angle: params.get_or("angle", FRAC_PI_4.to_degrees())?.to_radians(),
            angular_velocity: 0.0,
            gravity: params.positive_or("gravity", DEFAULT_GRAVITY)?,
            pivot: Vector3::new(0.0, 6.0, 0.0),
        })
    }

    /// Bob position relative to the pivot
    pub fn bob_offset(&self) -> Vector3<f32> {
        Vector3::new(
            self.length * self.angle.sin(),
            -self.length * self.angle.cos(),
            0.0,
        )
    }

    /// Small-angle period `2π·√(L/g)`
    pub fn period(&self) -> f32 {
        2.0 * std::f32::consts::PI * (self.length / self.gravity).sqrt()
    }

    fn integrate(&mut self, dt: f32) {
        let angular_acceleration = -(self.gravity / self.length) * self.angle.sin();
        self.angular_velocity += angular_acceleration * dt;
        self.angle += self.angular_velocity * dt;
        self.angular_velocity *= DAMPING;
    }

    fn apply_visuals(&self, ctx: &mut SimContext) -> Result<()> {
        let bob = ctx.entity("bob")?;
        let rod = ctx.entity("rod")?;

        let rod_vec = self.bob_offset();
        let bob_pos = self.pivot + rod_vec;
        ctx.store.set_position(bob, bob_pos)?;

        // Re-aim the rod's local +y axis along pivot -> bob
        let rod_len = rod_vec.magnitude();
        let aim = (-rod_vec.x).atan2(rod_vec.y).to_degrees();
        let pivot = self.pivot;
        ctx.store.update_transform(rod, |t| {
            t.position = pivot + rod_vec / 2.0;
            t.scale.y = rod_len;
            t.rotation = Vector3::new(0.0, 0.0, aim);
        })
    }
}

pub fn build(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Pendulum::from_params(params)?))
}

impl Experiment for Pendulum {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Pendulum
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let p = self.pivot;
        ctx.store.create(
            "pivot",
            EntityDesc::new(Model::Sphere)
                .at(p.x, p.y, p.z)
                .scale(0.2)
                .color(Color::BLACK),
        )?;
        ctx.store.create(
            "bob",
            EntityDesc::new(Model::Sphere).scale(0.5).color(Color::RED),
        )?;
        ctx.store.create(
            "rod",
            EntityDesc::new(Model::Cube)
                .scale_xyz(0.05, 1.0, 0.05)
                .color(Color::BLACK),
        )?;
        self.apply_visuals(ctx)
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.integrate(dt);
        self.apply_visuals(ctx)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("angle", self.angle.to_degrees(), "deg"),
            Reading::new("angular_velocity", self.angular_velocity, "rad/s"),
            Reading::new("length", self.length, "m"),
            Reading::new("period", self.period(), "s"),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
