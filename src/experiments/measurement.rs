//! Measuring instruments: rules, balances, cylinders, clocks

use std::any::Any;

use crate::error::Result;
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{
    ControlSignal, Experiment, ExperimentKind, ExperimentParams, Reading, SimContext,
};

/// Meter rule with a vernier caliper opening and closing
#[derive(Debug, Clone, Default)]
pub struct Length {
    pub jaw_x: f32,
}

pub fn build_length(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Length { jaw_x: -2.5 }))
}

impl Experiment for Length {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Length
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "rule",
            EntityDesc::new(Model::Cube)
                .at(0.0, 2.0, 1.0)
                .scale_xyz(10.0, 0.1, 0.5)
                .color(Color::YELLOW),
        )?;
        let main = ctx.store.create(
            "caliper_main",
            EntityDesc::new(Model::Cube)
                .at(0.0, 2.2, 0.0)
                .scale_xyz(5.0, 0.5, 0.1)
                .color(Color::GRAY),
        )?;
        ctx.store.create(
            "caliper_jaw",
            EntityDesc::new(Model::Cube)
                .at(self.jaw_x, 0.0, 0.0)
                .scale_xyz(0.1, 1.0, 1.0)
                .color(Color::LIGHT_GRAY)
                .parent(main),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, _dt: f32) -> Result<()> {
        self.jaw_x = -2.5 + (ctx.time.sin() + 1.0) * 2.5;
        let jaw = ctx.entity("caliper_jaw")?;
        let x = self.jaw_x;
        ctx.store.update_transform(jaw, |t| t.position.x = x)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("opening", self.jaw_x + 2.5, "m")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Object dropped onto an electronic balance
#[derive(Debug, Clone)]
struct BalanceDrop {
    object_y: f32,
}

impl BalanceDrop {
    const START: f32 = 3.0;
    const REST: f32 = 2.7;
    const SPEED: f32 = 5.0;

    fn new() -> Self {
        Self {
            object_y: Self::START,
        }
    }

    fn settled(&self) -> bool {
        self.object_y <= Self::REST
    }

    fn create(&self, ctx: &mut SimContext) -> Result<()> {
        let balance = ctx.store.create(
            "balance",
            EntityDesc::new(Model::Cube)
                .at(0.0, 2.25, 0.0)
                .scale_xyz(2.0, 0.5, 2.0)
                .color(Color::WHITE),
        )?;
        ctx.store.create(
            "plate",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 0.3, 0.0)
                .scale_xyz(1.8, 0.1, 1.8)
                .color(Color::LIGHT_GRAY)
                .parent(balance),
        )?;
        ctx.store.create(
            "object",
            EntityDesc::new(Model::Sphere)
                .at(0.0, self.object_y, 0.0)
                .scale(0.5)
                .color(Color::ORANGE),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.object_y = (self.object_y - Self::SPEED * dt).max(Self::REST);
        let object = ctx.entity("object")?;
        let y = self.object_y;
        ctx.store.update_transform(object, |t| t.position.y = y)
    }
}

/// Stone lowered into a measuring cylinder, displacing water
#[derive(Debug, Clone)]
struct Immersion {
    stone_y: f32,
    water_level: f32,
    water_y: f32,
}

impl Immersion {
    const STONE_START: f32 = 8.0;
    const SURFACE: f32 = 4.5;
    const SINK_SPEED: f32 = 2.0;
    const LEVEL_START: f32 = 0.4;
    const LEVEL_MAX: f32 = 0.6;
    const RISE_RATE: f32 = 0.1;

    fn new() -> Self {
        Self {
            stone_y: Self::STONE_START,
            water_level: Self::LEVEL_START,
            water_y: -0.1,
        }
    }

    /// Fraction of the full displacement reached so far
    fn displacement(&self) -> f32 {
        (self.water_level - Self::LEVEL_START) / (Self::LEVEL_MAX - Self::LEVEL_START)
    }

    fn create(&self, ctx: &mut SimContext) -> Result<()> {
        let cylinder = ctx.store.create(
            "cylinder",
            EntityDesc::new(Model::Cylinder)
                .at(-2.0, 4.5, 0.0)
                .scale_xyz(1.0, 5.0, 1.0)
                .color(Color::AZURE.with_alpha(0.3)),
        )?;
        ctx.store.create(
            "water",
            EntityDesc::new(Model::Cube)
                .at(0.0, self.water_y, 0.0)
                .scale_xyz(0.9, self.water_level, 0.9)
                .color(Color::BLUE.with_alpha(0.5))
                .parent(cylinder),
        )?;
        ctx.store.create(
            "stone",
            EntityDesc::new(Model::Sphere)
                .at(-2.0, self.stone_y, 0.0)
                .scale(0.3)
                .color(Color::GRAY),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if self.stone_y > Self::SURFACE {
            self.stone_y = (self.stone_y - Self::SINK_SPEED * dt).max(Self::SURFACE);
        } else {
            let rise = (Self::RISE_RATE * dt).min(Self::LEVEL_MAX - self.water_level);
            self.water_level += rise;
            self.water_y += rise / 2.0;
        }

        let stone = ctx.entity("stone")?;
        let water = ctx.entity("water")?;
        let stone_y = self.stone_y;
        let (level, water_y) = (self.water_level, self.water_y);
        ctx.store.update_transform(stone, |t| t.position.y = stone_y)?;
        ctx.store.update_transform(water, |t| {
            t.scale.y = level;
            t.position.y = water_y;
        })
    }
}

/// Reading an electronic balance
#[derive(Debug, Clone)]
pub struct Mass {
    drop: BalanceDrop,
    /// Grams
    pub mass: f32,
}

pub fn build_mass(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Mass {
        drop: BalanceDrop::new(),
        mass: params.positive_or("mass", 500.0)?,
    }))
}

impl Mass {
    pub fn object_height(&self) -> f32 {
        self.drop.object_y
    }
}

impl Experiment for Mass {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Mass
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        self.drop.create(ctx)
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.drop.update(ctx, dt)
    }

    fn readings(&self) -> Vec<Reading> {
        // The display reads zero until the object rests on the plate
        let shown = if self.drop.settled() { self.mass } else { 0.0 };
        vec![Reading::new("balance", shown, "g")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Volume by displacement in a measuring cylinder
#[derive(Debug, Clone)]
pub struct Volume {
    immersion: Immersion,
    /// Volume of the stone in cm³
    pub volume: f32,
}

pub fn build_volume(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Volume {
        immersion: Immersion::new(),
        volume: params.positive_or("volume", 200.0)?,
    }))
}

impl Volume {
    pub fn water_level(&self) -> f32 {
        self.immersion.water_level
    }
}

impl Experiment for Volume {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Volume
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        self.immersion.create(ctx)
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.immersion.update(ctx, dt)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new(
            "displaced",
            self.volume * self.immersion.displacement(),
            "cm3",
        )]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stopwatch driven by external start/stop signals
#[derive(Debug, Clone, Default)]
pub struct TimeMeasurement {
    pub counting: bool,
    pub elapsed: f32,
}

pub fn build_time_measurement(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(TimeMeasurement::default()))
}

impl Experiment for TimeMeasurement {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::TimeMeasurement
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let face = ctx.store.create(
            "clock_face",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 4.0, 0.0)
                .scale_xyz(2.0, 0.1, 2.0)
                .rotation(90.0, 0.0, 0.0)
                .color(Color::WHITE),
        )?;
        ctx.store.create(
            "hand",
            EntityDesc::new(Model::Cube)
                .at(0.0, 0.1, 0.0)
                .scale_xyz(0.05, 0.8, 0.05)
                .color(Color::RED)
                .parent(face),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.counting {
            return Ok(());
        }
        self.elapsed += dt;
        // One revolution per minute
        let angle = -self.elapsed * 6.0;
        let hand = ctx.entity("hand")?;
        ctx.store.update_transform(hand, |t| t.rotation.z = angle)
    }

    fn handle_signal(&mut self, signal: ControlSignal) -> bool {
        self.counting = signal == ControlSignal::Start;
        log::debug!("stopwatch counting: {}", self.counting);
        true
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("elapsed", self.elapsed, "s")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Mass on the balance and volume by displacement, side by side
#[derive(Debug, Clone)]
pub struct Density {
    drop: BalanceDrop,
    immersion: Immersion,
    /// Grams
    pub mass: f32,
    /// cm³
    pub volume: f32,
}

pub fn build_density(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Density {
        drop: BalanceDrop::new(),
        immersion: Immersion::new(),
        mass: params.positive_or("mass", 500.0)?,
        volume: params.positive_or("volume", 200.0)?,
    }))
}

impl Density {
    /// g/cm³
    pub fn density(&self) -> f32 {
        self.mass / self.volume
    }
}

impl Experiment for Density {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Density
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        self.drop.create(ctx)?;
        self.immersion.create(ctx)
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.drop.update(ctx, dt)?;
        self.immersion.update(ctx, dt)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("mass", self.mass, "g"),
            Reading::new("volume", self.volume, "cm3"),
            Reading::new("density", self.density(), "g/cm3"),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Target board for discussing accuracy and precision
#[derive(Debug, Clone, Default)]
pub struct Precision;

pub fn build_precision(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Precision))
}

impl Experiment for Precision {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Precision
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let target = ctx.store.create(
            "target",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 5.0, 0.0)
                .scale_xyz(3.0, 0.1, 3.0)
                .rotation(90.0, 0.0, 0.0)
                .color(Color::WHITE),
        )?;
        ctx.store.create(
            "bullseye",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 0.6, 0.0)
                .scale_xyz(0.2, 0.2, 0.2)
                .color(Color::RED)
                .parent(target),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityStore;

    fn run(experiment: &mut dyn Experiment, store: &mut EntityStore, steps: usize, dt: f32) {
        for i in 1..=steps {
            experiment
                .update(&mut SimContext::new(store, i as f32 * dt), dt)
                .unwrap();
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
    fn test_object_settles_on_plate() {
        let mut mass = build_mass(&ExperimentParams::new()).unwrap();
        let mut store = set_up(mass.as_mut());
        assert_eq!(mass.readings()[0].value, 0.0);

        run(mass.as_mut(), &mut store, 10, 0.05);
        assert_eq!(store.get("object").unwrap().transform.position.y, 2.7);
        assert_eq!(mass.readings()[0].value, 500.0);
    }

    #[test]
    fn test_water_rises_only_after_stone_enters() {
        let mut volume = build_volume(&ExperimentParams::new()).unwrap();
        let mut store = set_up(volume.as_mut());

        // 3.5 m at 2 m/s
        run(volume.as_mut(), &mut store, 17, 0.1);
        let state = volume.as_any().downcast_ref::<Volume>().unwrap();
        assert_eq!(state.water_level(), 0.4);

        run(volume.as_mut(), &mut store, 100, 0.1);
        let water = store.get("water").unwrap();
        assert!((water.transform.scale.y - 0.6).abs() < 1e-6);
        assert!((water.transform.position.y - 0.0).abs() < 1e-5);
        assert!((volume.readings()[0].value - 200.0).abs() < 1e-2);
    }

    #[test]
    fn test_stopwatch_counts_only_between_signals() {
        let mut watch = build_time_measurement(&ExperimentParams::new()).unwrap();
        let mut store = set_up(watch.as_mut());

        run(watch.as_mut(), &mut store, 10, 0.1);
        assert_eq!(watch.readings()[0].value, 0.0);

        assert!(watch.handle_signal(ControlSignal::Start));
        run(watch.as_mut(), &mut store, 10, 0.5);
        assert!(watch.handle_signal(ControlSignal::Stop));
        run(watch.as_mut(), &mut store, 10, 0.5);

        assert_eq!(watch.readings()[0].value, 5.0);
        let hand = store.get("hand").unwrap();
        assert_eq!(hand.transform.rotation.z, -30.0);
    }

    #[test]
    fn test_density_from_mass_and_volume() {
        let params = ExperimentParams::new().with("mass", 270.0).with("volume", 100.0);
        let mut density = build_density(&params).unwrap();
        let store = set_up(density.as_mut());
        assert!(store.contains("plate") && store.contains("stone"));
        assert!((density.readings()[2].value - 2.7).abs() < 1e-6);
    }

    #[test]
    fn test_caliper_stays_on_the_main_scale() {
        let mut length = build_length(&ExperimentParams::new()).unwrap();
        let mut store = set_up(length.as_mut());
        for i in 0..100 {
            length
                .update(&mut SimContext::new(&mut store, i as f32 * 0.1), 0.1)
                .unwrap();
            let x = store.get("caliper_jaw").unwrap().transform.position.x;
            assert!((-2.5..=2.5).contains(&x));
        }
    }
}
