//! Shared building blocks for experiment modules

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::scene::{EntityDesc, Model};
use crate::simulation::ExperimentParams;

/// Height of the lab bench surface that glassware rests on
pub const TABLE_TOP: f32 = 2.1;

/// Uniform scale applied to generated glassware assets
pub const ASSET_SCALE: f32 = 0.5;

/// Glassware placed on the bench, offset from bench height
pub fn lab_asset(name: &str, x: f32, z: f32) -> EntityDesc {
    EntityDesc::new(Model::asset(name))
        .at(x, TABLE_TOP, z)
        .scale(ASSET_SCALE)
}

/// Monotone `[0, 1]` accumulator driving a linear visual interpolation
///
/// Advances by `rate * dt` and clamps at 1. Once complete the accumulator is
/// terminal: it is never reset, and [`advance`](Self::advance) reports that
/// there is nothing left to derive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    value: f32,
    rate: f32,
}

impl Progress {
    pub fn new(rate: f32) -> Self {
        Self { value: 0.0, rate }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn is_complete(&self) -> bool {
        self.value >= 1.0
    }

    /// Returns `false` when already complete, leaving the value untouched
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.is_complete() {
            return false;
        }
        self.value = (self.value + self.rate * dt).min(1.0);
        true
    }
}

/// Seed used when a randomized layout gets no `seed` parameter
pub const DEFAULT_SEED: u64 = 42;

/// Deterministic generator for randomized layouts, seeded from `seed`
pub fn layout_rng(params: &ExperimentParams) -> Result<StdRng> {
    Ok(StdRng::seed_from_u64(params.seed_or("seed", DEFAULT_SEED)?))
}

/// Uniform sample in `[-half_extent, half_extent)`
pub fn scatter(rng: &mut StdRng, half_extent: f32) -> f32 {
    rng.random_range(-half_extent..half_extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_clamps_and_stops() {
        let mut progress = Progress::new(0.5);
        assert!(progress.advance(1.0));
        assert_eq!(progress.value(), 0.5);
        assert!(progress.advance(5.0));
        assert_eq!(progress.value(), 1.0);
        assert!(progress.is_complete());
        assert!(!progress.advance(1.0));
        assert_eq!(progress.value(), 1.0);
    }

    #[test]
    fn test_progress_monotone() {
        let mut progress = Progress::new(0.1);
        let mut last = 0.0;
        for _ in 0..200 {
            progress.advance(0.07);
            assert!(progress.value() >= last);
            assert!(progress.value() <= 1.0);
            last = progress.value();
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_layout_is_reproducible() {
        let params = ExperimentParams::new().with("seed", 7.0);
        let mut a = layout_rng(&params).unwrap();
        let mut b = layout_rng(&params).unwrap();
        for _ in 0..10 {
            let x = scatter(&mut a, 0.4);
            assert_eq!(x, scatter(&mut b, 0.4));
            assert!((-0.4..0.4).contains(&x));
        }
        assert!(layout_rng(&ExperimentParams::new().with("seed", 1.5)).is_err());
    }
}
