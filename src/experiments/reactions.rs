//! Color-change chemistry: mixing, titration, indicators, gas tests, combustion
//!
//! Most kinds here are a single [`Progress`] accumulator mapped onto a color or
//! a fluid level. Once the accumulator completes the visuals are frozen and
//! further updates write nothing.

use std::any::Any;

use crate::error::Result;
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{Experiment, ExperimentKind, ExperimentParams, Reading, SimContext};

use super::common::{lab_asset, Progress};

/// Fluid in a beaker darkening from cyan to purple as it fills
#[derive(Debug, Clone)]
pub struct ChemistryMix {
    pub progress: Progress,
}

pub const MIX_START: Color = Color::CYAN;
pub const MIX_END: Color = Color::rgb(0.5, 0.0, 0.5);

pub fn build_chemistry_mix(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(ChemistryMix {
        progress: Progress::new(params.positive_or("rate", 0.5)?),
    }))
}

impl Experiment for ChemistryMix {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::ChemistryMix
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let beaker = ctx.store.create(
            "beaker",
            lab_asset("beaker", 0.0, 0.0).color(Color::WHITE.with_alpha(0.5)),
        )?;
        ctx.store.create(
            "fluid",
            EntityDesc::new(Model::Cube)
                .at(0.0, 0.1, 0.0)
                .scale_xyz(0.8, 0.1, 0.8)
                .color(MIX_START)
                .parent(beaker),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.progress.advance(dt) {
            return Ok(());
        }
        let p = self.progress.value();
        let fluid = ctx.entity("fluid")?;
        let height = 0.1 + p * 1.5;
        ctx.store.set_color(fluid, MIX_START.lerp(MIX_END, p))?;
        ctx.store.update_transform(fluid, |t| {
            t.scale.y = height;
            t.position.y = height / 2.0;
        })?;
        if self.progress.is_complete() {
            log::info!("mixture fully reacted");
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

/// Acid run from a burette into a flask of base and phenolphthalein
#[derive(Debug, Clone)]
pub struct Titration {
    pub progress: Progress,
}

pub fn build_titration(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Titration {
        progress: Progress::new(params.positive_or("rate", 0.2)?),
    }))
}

impl Experiment for Titration {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Titration
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let flask = ctx.store.create(
            "beaker",
            lab_asset("flask", 0.0, 0.0).color(Color::WHITE.with_alpha(0.3)),
        )?;
        ctx.store.create(
            "burette_stand",
            EntityDesc::new(Model::Cube)
                .at(-1.0, 4.0, 0.0)
                .scale_xyz(0.1, 8.0, 0.1)
                .color(Color::GRAY),
        )?;
        ctx.store.create(
            "burette",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 5.0, 0.0)
                .scale_xyz(0.1, 4.0, 0.1)
                .color(Color::WHITE.with_alpha(0.5)),
        )?;
        ctx.store.create(
            "fluid",
            EntityDesc::new(Model::Cube)
                .at(0.0, 0.25, 0.0)
                .scale_xyz(2.0, 0.5, 2.0)
                .color(Color::MAGENTA)
                .parent(flask),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.progress.advance(dt) {
            return Ok(());
        }
        let p = self.progress.value();
        let fluid = ctx.entity("fluid")?;
        let height = 0.5 + p * 0.5;
        ctx.store
            .set_color(fluid, Color::MAGENTA.with_alpha((1.0 - p).max(0.1)))?;
        ctx.store.update_transform(fluid, |t| {
            t.scale.y = height;
            t.position.y = 0.25 + (height - 0.5) / 2.0;
        })?;
        if self.progress.is_complete() {
            log::info!("titration reached its end point");
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

/// Two beakers brought together, then their contents react
#[derive(Debug, Clone)]
pub struct ChemicalReaction {
    pub beaker_x: f32,
    pub mixed: bool,
    pub reaction_time: f32,
}

/// Seconds for the mixed solution to finish changing color
pub const REACTION_DURATION: f32 = 3.0;

pub fn build_chemical_reaction(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(ChemicalReaction {
        beaker_x: -1.0,
        mixed: false,
        reaction_time: 0.0,
    }))
}

impl Experiment for ChemicalReaction {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::ChemicalReaction
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let beaker1 = ctx.store.create("beaker1", lab_asset("beaker", self.beaker_x, 0.0))?;
        let beaker2 = ctx.store.create("beaker2", lab_asset("beaker", 1.0, 0.0))?;
        for (name, parent, color) in [
            ("reactant1", beaker1, Color::BLUE),
            ("reactant2", beaker2, Color::YELLOW),
        ] {
            ctx.store.create(
                name,
                EntityDesc::new(Model::Cube)
                    .at(0.0, 0.3, 0.0)
                    .scale_xyz(0.8, 0.5, 0.8)
                    .color(color)
                    .parent(parent),
            )?;
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.mixed {
            self.beaker_x += dt * 0.5;
            if self.beaker_x >= 0.0 {
                self.beaker_x = 0.0;
                self.mixed = true;
                log::info!("reactants mixed");
            }
            let beaker = ctx.entity("beaker1")?;
            let x = self.beaker_x;
            return ctx.store.update_transform(beaker, |t| t.position.x = x);
        }

        self.reaction_time += dt;
        let p = (self.reaction_time / REACTION_DURATION).min(1.0);
        let reactant1 = ctx.entity("reactant1")?;
        let reactant2 = ctx.entity("reactant2")?;
        ctx.store.set_color(reactant1, Color::BLUE.lerp(Color::GREEN, p))?;
        // Poured into the first beaker
        ctx.store.set_enabled(reactant2, false)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("reaction_time", self.reaction_time, "s")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Blue and red litmus dipped into acid and base
#[derive(Debug, Clone, Default)]
pub struct Litmus {
    pub dipped: bool,
    pub changed: bool,
}

pub const DIP_TIME: f32 = 3.0;
pub const CHANGE_TIME: f32 = 6.0;

pub fn build_litmus(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Litmus::default()))
}

impl Experiment for Litmus {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Litmus
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let acid_beaker = ctx.store.create("beaker_acid", lab_asset("beaker", -1.0, 0.0))?;
        let base_beaker = ctx.store.create("beaker_base", lab_asset("beaker", 1.0, 0.0))?;
        for (name, parent) in [("acid", acid_beaker), ("base", base_beaker)] {
            ctx.store.create(
                name,
                EntityDesc::new(Model::Cube)
                    .at(0.0, 0.25, 0.0)
                    .scale_xyz(0.8, 0.5, 0.8)
                    .color(Color::WHITE.with_alpha(0.3))
                    .parent(parent),
            )?;
        }
        for (name, x, color) in [("litmus_blue", -0.5, Color::BLUE), ("litmus_red", 0.5, Color::RED)] {
            ctx.store.create(
                name,
                EntityDesc::new(Model::Cube)
                    .at(x, 4.0, 0.0)
                    .scale_xyz(0.2, 1.0, 0.01)
                    .color(color),
            )?;
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, _dt: f32) -> Result<()> {
        let blue = ctx.entity("litmus_blue")?;
        let red = ctx.entity("litmus_red")?;

        if !self.dipped && ctx.time > DIP_TIME {
            self.dipped = true;
            for paper in [blue, red] {
                ctx.store.update_transform(paper, |t| t.position.y = 2.5)?;
            }
        }
        if !self.changed && ctx.time > CHANGE_TIME {
            self.changed = true;
            // Acid turns blue litmus red, base turns red litmus blue
            ctx.store.set_color(blue, Color::RED)?;
            ctx.store.set_color(red, Color::BLUE)?;
            log::info!("litmus papers changed color");
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Red cabbage indicator shifting from purple to pink as acid is added
#[derive(Debug, Clone)]
pub struct Indicators {
    pub progress: Progress,
}

pub fn build_indicators(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Indicators {
        progress: Progress::new(params.positive_or("rate", 0.2)?),
    }))
}

impl Experiment for Indicators {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Indicators
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let beaker = ctx.store.create("beaker", lab_asset("beaker", 0.0, 0.0))?;
        ctx.store.create(
            "indicator",
            EntityDesc::new(Model::Cube)
                .at(0.0, 0.25, 0.0)
                .scale_xyz(0.8, 0.5, 0.8)
                .color(Color::PURPLE)
                .parent(beaker),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.progress.advance(dt) {
            return Ok(());
        }
        let indicator = ctx.entity("indicator")?;
        let color = Color::PURPLE.lerp(Color::PINK, self.progress.value());
        ctx.store.set_color(indicator, color)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("progress", self.progress.value(), "")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Limewater turning milky as carbon dioxide bubbles through
#[derive(Debug, Clone)]
pub struct Co2Test {
    pub progress: Progress,
}

pub fn build_co2_test(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Co2Test {
        progress: Progress::new(params.positive_or("rate", 0.1)?),
    }))
}

impl Experiment for Co2Test {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Co2Test
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let tube = ctx.store.create("test_tube", lab_asset("test_tube", 0.0, 0.0))?;
        ctx.store.create(
            "limewater",
            EntityDesc::new(Model::Cube)
                .at(0.0, 1.5, 0.0)
                .scale_xyz(0.4, 3.0, 0.4)
                .color(Color::WHITE.with_alpha(0.1))
                .parent(tube),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        if !self.progress.advance(dt) {
            return Ok(());
        }
        let limewater = ctx.entity("limewater")?;
        let alpha = 0.1 + self.progress.value() * 0.8;
        ctx.store.set_color(limewater, Color::WHITE.with_alpha(alpha))
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("progress", self.progress.value(), "")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Candle starved of oxygen under a lowered jar
#[derive(Debug, Clone, Default)]
pub struct Combustion {
    /// Session time at which the jar came down
    pub lowered_at: Option<f32>,
    pub flame_size: f32,
    pub extinguished: bool,
}

pub const JAR_DROP_TIME: f32 = 5.0;
pub const FLAME_SIZE: f32 = 0.3;
/// Exponential decay constant of the flame once enclosed, per second
pub const FLAME_DECAY: f32 = 0.5;
/// Flames smaller than this are put out
pub const FLAME_MIN: f32 = 0.01;

pub fn build_combustion(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(Combustion {
        flame_size: FLAME_SIZE,
        ..Default::default()
    }))
}

impl Experiment for Combustion {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::Combustion
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let candle = ctx.store.create(
            "candle",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 3.0, 0.0)
                .scale_xyz(0.5, 2.0, 0.5)
                .color(Color::WHITE),
        )?;
        ctx.store.create(
            "flame",
            EntityDesc::new(Model::Sphere)
                .at(0.0, 0.6, 0.0)
                .scale(self.flame_size)
                .color(Color::ORANGE)
                .parent(candle),
        )?;
        ctx.store.create(
            "jar",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 10.0, 0.0)
                .scale_xyz(2.0, 4.0, 2.0)
                .color(Color::WHITE.with_alpha(0.2)),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, _dt: f32) -> Result<()> {
        if self.extinguished {
            return Ok(());
        }

        let lowered_at = match self.lowered_at {
            Some(at) => at,
            None if ctx.time > JAR_DROP_TIME => {
                let jar = ctx.entity("jar")?;
                ctx.store.update_transform(jar, |t| t.position.y = 4.5)?;
                self.lowered_at = Some(ctx.time);
                ctx.time
            }
            None => return Ok(()),
        };

        let flame = ctx.entity("flame")?;
        self.flame_size = FLAME_SIZE * (-FLAME_DECAY * (ctx.time - lowered_at)).exp();
        if self.flame_size < FLAME_MIN {
            self.extinguished = true;
            log::info!("flame out at {:.2}s", ctx.time);
            return ctx.store.set_enabled(flame, false);
        }
        let size = self.flame_size;
        ctx.store.update_transform(flame, |t| t.set_uniform_scale(size))
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("flame_size", self.flame_size, "")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityStore;

    fn set_up(experiment: &mut dyn Experiment) -> EntityStore {
        let mut store = EntityStore::new();
        experiment
            .setup(&mut SimContext::new(&mut store, 0.0))
            .unwrap();
        store
    }

    fn run(experiment: &mut dyn Experiment, store: &mut EntityStore, from: f32, steps: usize, dt: f32) {
        for i in 1..=steps {
            let time = from + i as f32 * dt;
            experiment
                .update(&mut SimContext::new(store, time), dt)
                .unwrap();
        }
    }

    #[test]
    fn test_mix_terminal_visuals_frozen() {
        let mut mix = build_chemistry_mix(&ExperimentParams::new()).unwrap();
        let mut store = set_up(mix.as_mut());
        run(mix.as_mut(), &mut store, 0.0, 30, 0.1);

        let fluid = store.get("fluid").unwrap().clone();
        assert_eq!(fluid.color, MIX_END);
        assert!((fluid.transform.scale.y - 1.6).abs() < 1e-6);
        assert!((fluid.transform.position.y - 0.8).abs() < 1e-6);

        store
            .set_color(store.handle("fluid").unwrap(), Color::RED)
            .unwrap();
        run(mix.as_mut(), &mut store, 3.0, 10, 0.1);
        // Completed accumulators write nothing
        assert_eq!(store.get("fluid").unwrap().color, Color::RED);
    }

    #[test]
    fn test_titration_alpha_floor() {
        let mut titration = build_titration(&ExperimentParams::new()).unwrap();
        let mut store = set_up(titration.as_mut());
        run(titration.as_mut(), &mut store, 0.0, 60, 0.1);
        let fluid = store.get("fluid").unwrap();
        assert!((fluid.color.a - 0.1).abs() < 1e-6);
        assert!((fluid.transform.scale.y - 1.0).abs() < 1e-6);
        assert!((fluid.transform.position.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_reaction_mixes_then_turns_green() {
        let mut reaction = build_chemical_reaction(&ExperimentParams::new()).unwrap();
        let mut store = set_up(reaction.as_mut());

        run(reaction.as_mut(), &mut store, 0.0, 4, 0.25);
        let beaker = store.get("beaker1").unwrap();
        assert_eq!(beaker.transform.position.x, -0.5);
        assert!(store.get("reactant2").unwrap().enabled);

        run(reaction.as_mut(), &mut store, 1.0, 30, 0.25);
        assert_eq!(store.get("beaker1").unwrap().transform.position.x, 0.0);
        assert_eq!(store.get("reactant1").unwrap().color, Color::GREEN);
        assert!(!store.get("reactant2").unwrap().enabled);
    }

    #[test]
    fn test_litmus_schedule() {
        let mut litmus = build_litmus(&ExperimentParams::new()).unwrap();
        let mut store = set_up(litmus.as_mut());

        run(litmus.as_mut(), &mut store, 0.0, 40, 0.1);
        let blue = store.get("litmus_blue").unwrap();
        assert_eq!(blue.transform.position.y, 2.5);
        assert_eq!(blue.color, Color::BLUE);

        run(litmus.as_mut(), &mut store, 4.0, 30, 0.1);
        assert_eq!(store.get("litmus_blue").unwrap().color, Color::RED);
        assert_eq!(store.get("litmus_red").unwrap().color, Color::BLUE);
    }

    #[test]
    fn test_flame_goes_out_under_jar() {
        let mut combustion = build_combustion(&ExperimentParams::new()).unwrap();
        let mut store = set_up(combustion.as_mut());

        run(combustion.as_mut(), &mut store, 0.0, 50, 0.1);
        assert_eq!(store.get("jar").unwrap().transform.position.y, 10.0);
        assert!(store.get("flame").unwrap().enabled);

        // ln(30) / 0.5 ≈ 6.8s after the jar comes down
        run(combustion.as_mut(), &mut store, 5.0, 80, 0.1);
        assert_eq!(store.get("jar").unwrap().transform.position.y, 4.5);
        assert!(!store.get("flame").unwrap().enabled);
        let state = combustion.as_any().downcast_ref::<Combustion>().unwrap();
        assert!(state.extinguished);
    }

    #[test]
    fn test_co2_limewater_turns_milky() {
        let mut test = build_co2_test(&ExperimentParams::new()).unwrap();
        let mut store = set_up(test.as_mut());
        run(test.as_mut(), &mut store, 0.0, 50, 0.1);
        let alpha = store.get("limewater").unwrap().color.a;
        assert!((alpha - 0.5).abs() < 1e-4);
    }
}
