//! Forces, springs, moments and equilibrium

use std::any::Any;

use crate::error::Result;
use crate::scene::{Color, EntityDesc, Model};
use crate::simulation::{Experiment, ExperimentKind, ExperimentParams, Reading, SimContext};

/// Spring balance on a stand, shared by the weight and Hooke's law kinds
///
/// Extension follows Hooke's law, `x = m·g/k`.
#[derive(Debug, Clone)]
pub struct SpringBalance {
    kind: ExperimentKind,
    pub mass: f32,
    pub gravity: f32,
    pub spring_constant: f32,
}

pub fn build_weight(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(SpringBalance {
        kind: ExperimentKind::Weight,
        mass: params.positive_or("mass", 0.5)?,
        gravity: params.positive_or("gravity", 9.81)?,
        spring_constant: 10.0,
    }))
}

pub fn build_hookes_law(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(SpringBalance {
        kind: ExperimentKind::HookesLaw,
        mass: params.positive_or("mass", 0.5)?,
        gravity: params.positive_or("gravity", 9.81)?,
        spring_constant: params.positive_or("spring_constant", 10.0)?,
    }))
}

impl SpringBalance {
    pub fn weight(&self) -> f32 {
        self.mass * self.gravity
    }

    pub fn extension(&self) -> f32 {
        self.weight() / self.spring_constant
    }

    fn apply_visuals(&self, ctx: &mut SimContext) -> Result<()> {
        let spring = ctx.entity("spring")?;
        let extension = self.extension();
        ctx.store.update_transform(spring, |t| {
            t.scale.y = 2.0 + extension;
            t.position.y = -1.0 - extension / 2.0;
        })
    }
}

impl Experiment for SpringBalance {
    fn kind(&self) -> ExperimentKind {
        self.kind
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let stand = ctx.store.create(
            "stand",
            EntityDesc::new(Model::Cube)
                .at(-2.0, 4.0, 0.0)
                .scale_xyz(0.1, 8.0, 0.1)
                .color(Color::GRAY),
        )?;
        let arm = ctx.store.create(
            "arm",
            EntityDesc::new(Model::Cube)
                .at(1.0, 4.0, 0.0)
                .scale_xyz(2.0, 0.1, 0.1)
                .color(Color::GRAY)
                .parent(stand),
        )?;
        let spring = ctx.store.create(
            "spring",
            EntityDesc::new(Model::Cylinder)
                .at(1.0, -1.0, 0.0)
                .scale_xyz(0.2, 2.0, 0.2)
                .color(Color::ORANGE)
                .parent(arm),
        )?;
        ctx.store.create(
            "hook",
            EntityDesc::new(Model::Sphere)
                .at(0.0, -0.6, 0.0)
                .scale(0.1)
                .color(Color::BLACK)
                .parent(spring),
        )?;
        self.apply_visuals(ctx)
    }

    fn update(&mut self, ctx: &mut SimContext, _dt: f32) -> Result<()> {
        self.apply_visuals(ctx)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![
            Reading::new("weight", self.weight(), "N"),
            Reading::new("extension", self.extension(), "m"),
            Reading::new("spring_constant", self.spring_constant, "N/m"),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Foam block squashed by a periodic force
#[derive(Debug, Clone, Default)]
pub struct ForceEffect {
    pub force: f32,
}

pub fn build_force_effect(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(ForceEffect::default()))
}

impl Experiment for ForceEffect {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::ForceEffect
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "foam",
            EntityDesc::new(Model::Cube)
                .at(0.0, 3.0, 0.0)
                .scale(2.0)
                .color(Color::WHITE),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, _dt: f32) -> Result<()> {
        self.force = ctx.time.sin() * 1.5;
        let height = (2.0 - self.force).max(0.5);
        let foam = ctx.entity("foam")?;
        ctx.store.update_transform(foam, |t| t.scale.y = height)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("force", self.force, "N")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Spanner turning a bolt
#[derive(Debug, Clone)]
pub struct MomentsLever {
    pub angle: f32,
    /// Degrees per second
    pub turn_rate: f32,
}

pub fn build_moments_lever(params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(MomentsLever {
        angle: 0.0,
        turn_rate: params.get_or("turn_rate", 30.0)?,
    }))
}

impl Experiment for MomentsLever {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::MomentsLever
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        let bolt = ctx.store.create(
            "bolt",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 3.0, 0.0)
                .scale_xyz(0.5, 0.2, 0.5)
                .rotation(90.0, 0.0, 0.0)
                .color(Color::GRAY),
        )?;
        ctx.store.create(
            "spanner",
            EntityDesc::new(Model::Cube)
                .at(0.0, 2.0, 0.0)
                .scale_xyz(0.2, 4.0, 0.1)
                .color(Color::LIGHT_GRAY)
                .parent(bolt),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) -> Result<()> {
        self.angle = (self.angle + self.turn_rate * dt) % 360.0;
        let bolt = ctx.entity("bolt")?;
        let angle = self.angle;
        ctx.store.update_transform(bolt, |t| t.rotation.z = angle)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("angle", self.angle, "deg")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Metre rule balanced on a fulcrum, rocking gently
#[derive(Debug, Clone, Default)]
pub struct PrincipleOfMoments {
    pub tilt: f32,
}

pub fn build_principle_of_moments(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(PrincipleOfMoments::default()))
}

impl Experiment for PrincipleOfMoments {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::PrincipleOfMoments
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "fulcrum",
            EntityDesc::new(Model::Cone)
                .at(0.0, 2.5, 0.0)
                .scale_xyz(0.5, 1.0, 0.5)
                .color(Color::GRAY),
        )?;
        ctx.store.create(
            "rule",
            EntityDesc::new(Model::Cube)
                .at(0.0, 3.05, 0.0)
                .scale_xyz(10.0, 0.1, 0.5)
                .color(Color::YELLOW),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, _dt: f32) -> Result<()> {
        self.tilt = ctx.time.sin() * 2.0;
        let rule = ctx.entity("rule")?;
        let tilt = self.tilt;
        ctx.store.update_transform(rule, |t| t.rotation.z = tilt)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("tilt", self.tilt, "deg")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Suspended cutout rocking about its pin until it settles below the pivot
#[derive(Debug, Clone)]
pub struct CenterOfMass {
    pub swing: f32,
    /// Seconds until the swing dies out
    pub settle_time: f32,
}

pub fn build_center_of_mass(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(CenterOfMass {
        swing: 0.0,
        settle_time: 5.0,
    }))
}

impl Experiment for CenterOfMass {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::CenterOfMass
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "cutout",
            EntityDesc::new(Model::Cube)
                .at(0.0, 4.0, 0.0)
                .scale_xyz(2.0, 2.0, 0.1)
                .color(Color::ORANGE),
        )?;
        ctx.store.create(
            "pivot_pin",
            EntityDesc::new(Model::Cylinder)
                .at(0.0, 4.8, 0.0)
                .scale_xyz(0.05, 0.2, 0.05)
                .color(Color::BLACK),
        )?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut SimContext, _dt: f32) -> Result<()> {
        let envelope = (1.0 - ctx.time / self.settle_time).max(0.0);
        self.swing = (ctx.time * 2.0).sin() * 5.0 * envelope;
        let cutout = ctx.entity("cutout")?;
        let swing = self.swing;
        ctx.store.update_transform(cutout, |t| t.rotation.z = swing)
    }

    fn readings(&self) -> Vec<Reading> {
        vec![Reading::new("swing", self.swing, "deg")]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stable, unstable and neutral equilibrium side by side
#[derive(Debug, Clone, Default)]
pub struct EquilibriumTypes;

pub fn build_equilibrium_types(_params: &ExperimentParams) -> Result<Box<dyn Experiment>> {
    Ok(Box::new(EquilibriumTypes))
}

impl Experiment for EquilibriumTypes {
    fn kind(&self) -> ExperimentKind {
        ExperimentKind::EquilibriumTypes
    }

    fn setup(&mut self, ctx: &mut SimContext) -> Result<()> {
        ctx.store.create(
            "stable_cone",
            EntityDesc::new(Model::Cone)
                .at(-2.0, 2.0, 0.0)
                .scale_xyz(1.0, 1.5, 1.0)
                .color(Color::GREEN),
        )?;
        ctx.store.create(
            "unstable_cone",
            EntityDesc::new(Model::Cone)
                .at(0.0, 2.0, 0.0)
                .scale_xyz(1.0, 1.5, 1.0)
                .rotation(180.0, 0.0, 0.0)
                .color(Color::RED),
        )?;
        ctx.store.create(
            "neutral_sphere",
            EntityDesc::new(Model::Sphere)
                .at(2.0, 2.0, 0.0)
                .color(Color::BLUE),
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

    fn set_up(experiment: &mut dyn Experiment) -> EntityStore {
        let mut store = EntityStore::new();
        experiment
            .setup(&mut SimContext::new(&mut store, 0.0))
            .unwrap();
        store
    }

    #[test]
    fn test_weight_and_hookes_law_agree_by_default() {
        let weight = build_weight(&ExperimentParams::new()).unwrap();
        let hooke = build_hookes_law(&ExperimentParams::new()).unwrap();
        assert_eq!(weight.readings(), hooke.readings());
        let extension = weight.readings()[1].value;
        assert!((extension - 0.4905).abs() < 1e-5);
    }

    #[test]
    fn test_stiffer_spring_stretches_less() {
        let params = ExperimentParams::new().with("spring_constant", 20.0);
        let mut hooke = build_hookes_law(&params).unwrap();
        let store = set_up(hooke.as_mut());
        let spring = store.get("spring").unwrap();
        assert!((spring.transform.scale.y - (2.0 + 0.24525)).abs() < 1e-5);
    }

    #[test]
    fn test_foam_never_thinner_than_half() {
        let mut foam = build_force_effect(&ExperimentParams::new()).unwrap();
        let mut store = set_up(foam.as_mut());
        for i in 1..400 {
            let time = i as f32 * 0.05;
            foam.update(&mut SimContext::new(&mut store, time), 0.05)
                .unwrap();
            let height = store.get("foam").unwrap().transform.scale.y;
            assert!((0.5..=3.5).contains(&height));
        }
    }

    #[test]
    fn test_center_of_mass_settles() {
        let mut com = build_center_of_mass(&ExperimentParams::new()).unwrap();
        let mut store = set_up(com.as_mut());
        com.update(&mut SimContext::new(&mut store, 6.0), 0.1)
            .unwrap();
        assert_eq!(store.get("cutout").unwrap().transform.rotation.z, 0.0);
    }
}
