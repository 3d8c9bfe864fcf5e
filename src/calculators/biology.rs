//! DNA base pairing and a three-species food chain

use crate::error::{LabError, Result};

pub const DEFAULT_ECOSYSTEM_STEPS: usize = 50;

/// Watson-Crick complement of a DNA sequence
///
/// Input is case-insensitive; output is uppercase.
pub fn complementary_strand(sequence: &str) -> Result<String> {
    sequence
        .chars()
        .map(|base| match base.to_ascii_uppercase() {
            'A' => Ok('T'),
            'T' => Ok('A'),
            'C' => Ok('G'),
            'G' => Ok('C'),
            other => Err(LabError::invalid_parameter(
                "sequence",
                format!("`{}` is not a DNA base", other),
            )),
        })
        .collect()
}

/// Grass, rabbit and fox populations at one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Populations {
    pub grass: f32,
    pub rabbits: f32,
    pub foxes: f32,
}

impl Default for Populations {
    fn default() -> Self {
        Self {
            grass: 1000.0,
            rabbits: 100.0,
            foxes: 10.0,
        }
    }
}

impl Populations {
    /// Advance one step; each level feeds on the already-updated level below
    fn next(self) -> Self {
        let grass = self.grass + 0.1 * self.grass * (1.0 - self.grass / 1000.0);
        let rabbits = self.rabbits + 0.05 * self.rabbits * (grass / 1000.0) - 0.02 * self.rabbits;
        let foxes = self.foxes + 0.01 * self.foxes * (rabbits / 100.0) - 0.05 * self.foxes;
        Self {
            grass,
            rabbits,
            foxes,
        }
    }
}

/// Discrete predator-prey run of `steps` samples, the first being `initial`
pub fn ecosystem(initial: Populations, steps: usize) -> Result<Vec<Populations>> {
    for (name, value) in [
        ("grass", initial.grass),
        ("rabbits", initial.rabbits),
        ("foxes", initial.foxes),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(LabError::invalid_parameter(
                name,
                format!("{} is not a population", value),
            ));
        }
    }

    Ok(std::iter::successors(Some(initial), |p| Some(p.next()))
        .take(steps)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement() {
        assert_eq!(complementary_strand("ATCG").unwrap(), "TAGC");
        assert_eq!(complementary_strand("ggaa").unwrap(), "CCTT");
        assert_eq!(complementary_strand("").unwrap(), "");
        assert!(matches!(
            complementary_strand("ATXG"),
            Err(LabError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_ecosystem_first_step() {
        let run = ecosystem(Populations::default(), DEFAULT_ECOSYSTEM_STEPS).unwrap();
        assert_eq!(run.len(), 50);
        assert_eq!(run[0], Populations::default());

        // Grass at carrying capacity stays put
        assert_eq!(run[1].grass, 1000.0);
        assert!((run[1].rabbits - 103.0).abs() < 1e-4);
        assert!((run[1].foxes - (10.0 + 0.1 * 1.03 - 0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_extinct_species_stays_extinct() {
        let start = Populations {
            grass: 500.0,
            rabbits: 0.0,
            foxes: 0.0,
        };
        let run = ecosystem(start, 20).unwrap();
        assert!(run.iter().all(|p| p.rabbits == 0.0 && p.foxes == 0.0));
        assert!(run[19].grass > 500.0);
        assert!(ecosystem(Populations { foxes: -1.0, ..start }, 5).is_err());
    }
}
