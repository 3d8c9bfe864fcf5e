//! The closed set of experiment kinds

use std::fmt;
use std::str::FromStr;

use crate::error::LabError;

/// Scientific domain an experiment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Mechanics,
    Measurement,
    Electricity,
    Chemistry,
    Biology,
    EarthSpace,
}

macro_rules! experiment_kinds {
    ($($variant:ident => $id:literal, $domain:ident $(, aliases [$($alias:literal),*])?;)*) => {
        /// Every experiment the engine can simulate
        ///
        /// Adding a kind means adding a module; there is no runtime registration
        /// of new kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ExperimentKind {
            $($variant,)*
        }

        impl ExperimentKind {
            pub const ALL: &'static [ExperimentKind] = &[$(ExperimentKind::$variant,)*];

            /// Canonical snake_case identifier
            pub fn id(self) -> &'static str {
                match self {
                    $(ExperimentKind::$variant => $id,)*
                }
            }

            pub fn domain(self) -> Domain {
                match self {
                    $(ExperimentKind::$variant => Domain::$domain,)*
                }
            }
        }

        impl FromStr for ExperimentKind {
            type Err = LabError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($id $($(| $alias)*)? => Ok(ExperimentKind::$variant),)*
                    other => Err(LabError::UnknownKind(other.to_string())),
                }
            }
        }
    };
}

experiment_kinds! {
    Pendulum => "pendulum", Mechanics;
    Circuit => "circuit", Electricity;
    ChemistryMix => "chemistry_mix", Chemistry;
    Titration => "titration", Chemistry;
    ChemicalReaction => "chemical_reaction", Chemistry, aliases ["reaction"];
    Cell => "cell", Biology;
    Dna => "dna", Biology;
    MeltingBoiling => "melting_boiling", Chemistry;
    Diffusion => "diffusion", Chemistry;
    Filtration => "filtration", Chemistry;
    Evaporation => "evaporation", Chemistry;
    Combustion => "combustion", Chemistry;
    Co2Test => "co2_test", Chemistry;
    Solvent => "solvent", Chemistry;
    WaterFiltration => "water_filtration", Chemistry;
    Litmus => "litmus", Chemistry;
    Indicators => "indicators", Chemistry;
    ApparatusId => "apparatus_id", Chemistry;
    Safety => "safety", Chemistry;
    Workflow => "workflow", Chemistry;
    Length => "length", Measurement;
    Mass => "mass", Measurement;
    Volume => "volume", Measurement;
    TimeMeasurement => "time_measurement", Measurement, aliases ["time_meas"];
    Weight => "weight", Mechanics;
    Density => "density", Measurement;
    Precision => "precision", Measurement;
    CenterOfMass => "center_of_mass", Mechanics, aliases ["com"];
    EquilibriumTypes => "equilibrium_types", Mechanics, aliases ["equilibrium"];
    LinearMotion => "linear_motion", Mechanics;
    FreeFall => "free_fall", Mechanics;
    ForceEffect => "force_effect", Mechanics;
    Friction => "friction", Mechanics;
    HookesLaw => "hookes_law", Mechanics;
    CircularMotion => "circular_motion", Mechanics;
    MomentsLever => "moments_lever", Mechanics;
    PrincipleOfMoments => "principle_of_moments", Mechanics, aliases ["principle_moments"];
    SolarSystem => "solar_system", EarthSpace;
    EarthStructure => "earth_structure", EarthSpace;
    Atmosphere => "atmosphere", EarthSpace;
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for kind in ExperimentKind::ALL {
            assert_eq!(kind.id().parse::<ExperimentKind>().unwrap(), *kind);
        }
        assert_eq!(ExperimentKind::ALL.len(), 40);
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!(
            "time_meas".parse::<ExperimentKind>().unwrap(),
            ExperimentKind::TimeMeasurement
        );
        assert_eq!(
            "com".parse::<ExperimentKind>().unwrap(),
            ExperimentKind::CenterOfMass
        );
        assert_eq!(
            "reaction".parse::<ExperimentKind>().unwrap(),
            ExperimentKind::ChemicalReaction
        );
    }

    #[test]
    fn test_circuit_is_electricity() {
        assert_eq!(ExperimentKind::Circuit.domain(), Domain::Electricity);
        let electrical: Vec<_> = ExperimentKind::ALL
            .iter()
            .filter(|kind| kind.domain() == Domain::Electricity)
            .collect();
        assert_eq!(electrical, [&ExperimentKind::Circuit]);
        assert_eq!(ExperimentKind::Pendulum.domain(), Domain::Mechanics);
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            "optics".parse::<ExperimentKind>().unwrap_err(),
            LabError::UnknownKind("optics".to_string())
        );
    }
}
