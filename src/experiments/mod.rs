//! # Experiments
//!
//! One module per group of related experiment kinds. Every kind owns a typed
//! state struct implementing [`Experiment`](crate::simulation::Experiment) and a
//! `build` factory that reads its parameters.
//!
//! - [`pendulum`] - nonlinear damped pendulum
//! - [`motion`] - linear motion, friction, free fall, circular motion
//! - [`forces`] - springs, moments, center of mass, equilibrium
//! - [`measurement`] - length, mass, volume, time, density, precision
//! - [`circuit`] - Ohm's law circuit
//! - [`reactions`] - mixing, titration, indicators, gas tests, combustion
//! - [`separation`] - melting and boiling, diffusion, filtration, evaporation
//! - [`lab_skills`] - apparatus, safety, workflow scenes
//! - [`biology`] - cell and DNA
//! - [`earth_space`] - solar system, Earth's layers, atmosphere

pub mod biology;
pub mod circuit;
pub mod common;
pub mod earth_space;
pub mod forces;
pub mod lab_skills;
pub mod measurement;
pub mod motion;
pub mod pendulum;
pub mod reactions;
pub mod separation;

use crate::simulation::{ExperimentKind, Registry};

/// Register the factory of every built-in kind
pub fn register_all(registry: &mut Registry) {
    use ExperimentKind::*;

    registry.register(Pendulum, pendulum::build);
    registry.register(Circuit, circuit::build);

    registry.register(ChemistryMix, reactions::build_chemistry_mix);
    registry.register(Titration, reactions::build_titration);
    registry.register(ChemicalReaction, reactions::build_chemical_reaction);
    registry.register(Combustion, reactions::build_combustion);
    registry.register(Co2Test, reactions::build_co2_test);
    registry.register(Litmus, reactions::build_litmus);
    registry.register(Indicators, reactions::build_indicators);

    registry.register(MeltingBoiling, separation::build_melting_boiling);
    registry.register(Diffusion, separation::build_diffusion);
    registry.register(Filtration, separation::build_filtration);
    registry.register(Evaporation, separation::build_evaporation);
    registry.register(Solvent, separation::build_solvent);
    registry.register(WaterFiltration, separation::build_water_filtration);

    registry.register(ApparatusId, lab_skills::build_apparatus_id);
    registry.register(Safety, lab_skills::build_safety);
    registry.register(Workflow, lab_skills::build_workflow);

    registry.register(Cell, biology::build_cell);
    registry.register(Dna, biology::build_dna);

    registry.register(Length, measurement::build_length);
    registry.register(Mass, measurement::build_mass);
    registry.register(Volume, measurement::build_volume);
    registry.register(TimeMeasurement, measurement::build_time_measurement);
    registry.register(Density, measurement::build_density);
    registry.register(Precision, measurement::build_precision);

    registry.register(Weight, forces::build_weight);
    registry.register(HookesLaw, forces::build_hookes_law);
    registry.register(ForceEffect, forces::build_force_effect);
    registry.register(CenterOfMass, forces::build_center_of_mass);
    registry.register(EquilibriumTypes, forces::build_equilibrium_types);
    registry.register(MomentsLever, forces::build_moments_lever);
    registry.register(PrincipleOfMoments, forces::build_principle_of_moments);

    registry.register(LinearMotion, motion::build_linear_motion);
    registry.register(FreeFall, motion::build_free_fall);
    registry.register(Friction, motion::build_friction);
    registry.register(CircularMotion, motion::build_circular_motion);

    registry.register(SolarSystem, earth_space::build_solar_system);
    registry.register(EarthStructure, earth_space::build_earth_structure);
    registry.register(Atmosphere, earth_space::build_atmosphere);
}
