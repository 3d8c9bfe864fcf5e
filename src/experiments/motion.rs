//! Kinematics: linear motion, free fall, friction, circular motion
//!
//! Track-bound kinds loop: once the moving body reaches the far bound of its
//! track it is teleported back to the start within the same tick, so it never
//! shows past the end.

use std::any::Any;
use std::f32::consts::TAU;

use cgmath::Vector3;

use crate::error::{LabError, Result};
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{
    ControlSignal, Experiment, ExperimentKind, ExperimentParams, Reading, SimContext,
};

/// Start and end bounds shared by the 10 m tracks
pub const TRACK_START: f32 = -4.5;
pub const TRACK_END: f32 = 4.5;

fn create_track(ctx: &mut SimContext, name: &str) -> Result<()> {
    ctx.store.create(
        name,
        EntityDesc::new(Model::Cube)
            .at(0.0, 2.0, 0.0)
            .scale_xyz(10.0, 0.1, 1.0)
            .color(Color::GRAY),
    )?;
    Ok(())
}

/// Cart accelerating from rest along a track
#[derive(Debug, Clone)]
pub struct LinearMotion {
    pub position: f32,
    pub velocity: f32,
    pub acceleration: f32,
    pub laps: u32,
}

pub fn build_linear_motion(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(LinearMotion {
        position: TRACK_START,
        velocity: 0.0,
        acceleration: params.positive_or("acceleration", 1.0)?,
        laps: 0,
    }))
}

impl Experiment for LinearMotion {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::LinearMotion
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        create_track(ctx, "track")?;
        ctx.store.create(
            "cart",
            EntityDesc::new(Model::Cube)
                .at(self.position, 2.2, 0.0)
                .scale_xyz(0.5, 0.3, 0.5)
                .color(Color::RED),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
        if self.position >= TRACK_END {
            self.position = TRACK_START;
            self.velocity = 0.0;
            self.laps += 1;
        }

        let cart = ctx.entity("cart")?;
        let x = self.position;
        ctx.store.update_transform(cart, |t| t.position.x = x)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("position", self.position, "m"),
            Reading::new("velocity", self.velocity, "m/s"),
            Reading::new("acceleration", self.acceleration, "m/s^2"),
            Reading::new("laps", self.laps as f32, ""),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Block pulled at constant speed across a rough surface
#[derive(Debug, Clone)]
pub struct Friction {
    pub position: f32,
    pub speed: f32,
    pub mu: f32,
    pub mass: f32,
    pub gravity: f32,
}

pub fn build_friction(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Friction {
        position: TRACK_START,
        speed: params.positive_or("speed", 2.0)?,
        mu: params.non_negative_or("mu", 0.5)?,
        mass: params.positive_or("mass", 1.0)?,
        gravity: params.positive_or("gravity", 9.81)?,
    }))
}

impl Friction {
    /// Kinetic friction `μ·m·g`, balanced by the pull at constant speed
    pub fn friction_force(&self) -> f32 {
        self.mu * self.mass * self.gravity
    }
}

impl Experiment for Friction {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Friction
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        create_track(ctx, "surface")?;
        ctx.store.create(
            "block",
            EntityDesc::new(Model::Cube)
                .at(self.position, 2.3, 0.0)
                .scale(0.5)
                .color(Color::BROWN),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.position += self.speed * dt;
        if self.position >= TRACK_END {
            self.position = TRACK_START;
        }

        let block = ctx.entity("block")?;
        let x = self.position;
        ctx.store.update_transform(block, |t| t.position.x = x)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("position", self.position, "m"),
            Reading::new("mu", self.mu, ""),
            Reading::new("friction_force", self.friction_force(), "N"),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ball dropped from a tower onto a floor, `s = ½gt²` from the drop trigger
#[derive(Debug, Clone)]
pub struct FreeFall {
    pub drop_height: f32,
    pub floor: f32,
    pub gravity: f32,
    pub falling: bool,
    pub landed: bool,
    pub fall_time: f32,
}

pub fn build_free_fall(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    let floor = params.get_or("floor", 2.0)?;
    let drop_height = params.get_or("height", 10.0)?;
    if drop_height <= floor {
        return Err(LabError::invalid_parameter(
            "height",
            format!("{} must be above the floor at {}", drop_height, floor),
        ));
    }
    Ok(Box::new(FreeFall {
        drop_height,
        floor,
        gravity: params.positive_or("gravity", 9.81)?,
        falling: false,
        landed: false,
        fall_time: 0.0,
    }))
}

impl FreeFall {
    /// Analytic time to fall from the drop height to the floor
    pub fn impact_time(&self) -> f32 {
        (2.0 * (self.drop_height - self.floor) / self.gravity).sqrt()
    }

    pub fn ball_height(&self) -> f32 {
        if self.landed {
            return self.floor;
        }
        let dist = 0.5 * self.gravity * self.fall_time * self.fall_time;
        (self.drop_height - dist).max(self.floor)
    }
}

impl Experiment for FreeFall {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::FreeFall
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "tower",
            EntityDesc::new(Model::Cube)
                .at(-2.0, self.drop_height / 2.0, 0.0)
                .scale_xyz(0.2, self.drop_height, 0.2)
                .color(Color::GRAY),
        )?;
        ctx.store.create(
            "ball",
            EntityDesc::new(Model::Sphere)
                .at(-2.0, self.drop_height, 0.0)
                .scale(0.3)
                .color(Color::WHITE),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if self.falling {
            self.fall_time += dt;
            if self.fall_time >= self.impact_time() {
                self.fall_time = self.impact_time();
                self.falling = false;
                self.landed = true;
                log::info!("ball landed after {:.3}s", self.fall_time);
            }
        }

        let ball = ctx.entity("ball")?;
        let y = self.ball_height();
        ctx.store.update_transform(ball, |t| t.position.y = y)
    }

    /// `Start` drops the ball from the top, `Stop` holds it in place
    fn handle_signal(&mut self, signal: ControlSignal) -> bool {
        match signal {
            ControlSignal::Start => {
                self.falling = true;
                self.landed = false;
                self.fall_time = 0.0;
            }
            ControlSignal::Stop => self.falling = false,
        }
        true
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("fall_time", self.fall_time, "s"),
            Reading::new("height", self.ball_height(), "m"),
            Reading::new("velocity", self.gravity * self.fall_time, "m/s"),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Bung whirled on a string at constant angular speed
#[derive(Debug, Clone)]
pub struct CircularMotion {
    pub angle: f32,
    pub radius: f32,
    pub angular_speed: f32,
    pub height: f32,
}

pub fn build_circular_motion(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(CircularMotion {
        angle: 0.0,
        radius: params.positive_or("radius", 2.0)?,
        angular_speed: params.get_or("angular_speed", 5.0)?,
        height: 5.0,
    }))
}

impl CircularMotion {
    fn bung_position(&self) -> Vector3<f32> {
        Vector3::new(
            self.angle.cos() * self.radius,
            self.height,
            self.angle.sin() * self.radius,
        )
    }
}

impl Experiment for CircularMotion {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::CircularMotion
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let p = self.bung_position();
        ctx.store.create(
            "bung",
            EntityDesc::new(Model::Sphere)
                .at(p.x, p.y, p.z)
                .scale(0.3)
                .color(Color::RED),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.angle = (self.angle + self.angular_speed * dt) % TAU;
        let bung = ctx.entity("bung")?;
        ctx.store.set_position(bung, self.bung_position())
    }

    fn readings(&self) -> Vec<Reading> {
        let speed = self.angular_speed.abs();
        vec![
            Reading::new("angle", self.angle, "rad"),
            Reading::new("speed", speed * self.radius, "m/s"),
            Reading::new(
                "centripetal_acceleration",
                speed * speed * self.radius,
                "m/s^2",
            ),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityStore;

    fn run(
        experiment: &mut dyn Experiment,
        store: &mut EntityStore,
        dt: f32,
        steps: usize,
        mut each: impl FnMut(&dyn Experiment, &EntityStore),
    ) {
        let mut time = 0.0;
        for _ in 0..steps {
            time += dt;
            experiment
                .update(&mut SimContext::new(store, time), dt)
                .unwrap();
            each(experiment, store);
        }
    }

    fn set_up(experiment: &mut dyn Experiment) -> EntityStore {
        let mut store = EntityStore::new();
        experiment
            .setup(&mut SimContext::new(&mut store, 0.0))
            .unwrap();
        store
    }

    #[test]
    fn test_free_fall_time_and_floor_clamp() {
        let mut fall = build_free_fall(&ExperimentParams::new()).unwrap();
        let mut store = set_up(fall.as_mut());
        assert!(fall.handle_signal(ControlSignal::Start));

        let ball = store.handle("ball").unwrap();
        run(fall.as_mut(), &mut store, 0.001, 3000, |_, store| {
            let y = store.world_position(ball).unwrap().y;
            assert!(y >= 2.0, "ball below floor at {}", y);
        });

        let state = fall.as_any().downcast_ref::<FreeFall>().unwrap();
        assert!(state.landed);
        let expected = (2.0_f32 * 8.0 / 9.81).sqrt();
        assert!((state.fall_time - expected).abs() < 1e-4);
        assert!((expected - 1.277).abs() < 1e-3);
        assert_eq!(store.world_position(ball).unwrap().y, 2.0);
    }

    #[test]
    fn test_free_fall_waits_for_trigger() {
        let mut fall = build_free_fall(&ExperimentParams::new()).unwrap();
        let mut store = set_up(fall.as_mut());
        let ball = store.handle("ball").unwrap();
        run(fall.as_mut(), &mut store, 0.1, 10, |_, _| {});
        assert_eq!(store.world_position(ball).unwrap().y, 10.0);
    }

    #[test]
    fn test_free_fall_rejects_height_below_floor() {
        let params = ExperimentParams::new().with("height", 1.0);
        assert!(build_free_fall(&params).is_err());
    }

    #[test]
    fn test_cart_loops_without_overshoot() {
        let mut motion = build_linear_motion(&ExperimentParams::new()).unwrap();
        let mut store = set_up(motion.as_mut());
        let cart = store.handle("cart").unwrap();

        let mut last_x = TRACK_START;
        let mut resets = 0;
        run(motion.as_mut(), &mut store, 0.05, 400, |_, store| {
            let x = store.world_position(cart).unwrap().x;
            assert!(x < TRACK_END);
            if x < last_x {
                assert_eq!(x, TRACK_START);
                resets += 1;
            }
            last_x = x;
        });
        // 9 m from rest at 1 m/s^2 takes about 4.24 s, so 20 s holds 4 laps
        assert_eq!(resets, 4);
    }

    #[test]
    fn test_friction_block_wraps() {
        let mut friction = build_friction(&ExperimentParams::new()).unwrap();
        let mut store = set_up(friction.as_mut());
        let block = store.handle("block").unwrap();
        run(friction.as_mut(), &mut store, 0.5, 9, |_, store| {
            assert!(store.world_position(block).unwrap().x < TRACK_END);
        });
        // 4.5 s at 2 m/s covers exactly 9 m, landing back on the start
        assert_eq!(store.world_position(block).unwrap().x, TRACK_START);
        let state = friction.as_any().downcast_ref::<Friction>().unwrap();
        assert!((state.friction_force() - 4.905).abs() < 1e-4);
    }

    #[test]
    fn test_circular_motion_keeps_radius() {
        let mut circle = build_circular_motion(&ExperimentParams::new()).unwrap();
        let mut store = set_up(circle.as_mut());
        let bung = store.handle("bung").unwrap();
        run(circle.as_mut(), &mut store, 0.016, 500, |_, store| {
            let p = store.world_position(bung).unwrap();
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!((r - 2.0).abs() < 1e-4);
            assert_eq!(p.y, 5.0);
        });
    }
}
