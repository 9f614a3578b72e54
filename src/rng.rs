//! Seedable random source
//!
//! Scenario randomness (incoming fire timing, damage rolls) goes through
//! [`GameRng`] so a seeded run replays identically.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::combat::damage::DamageCategory;

/// Random number generator resource
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seeded when a seed is given, entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Pick a damage category from `choices`, or from every category when empty
    pub fn random_category(&mut self, choices: &[DamageCategory]) -> DamageCategory {
        let pool = if choices.is_empty() {
            DamageCategory::all()
        } else {
            choices
        };
        pool[self.rng.gen_range(0..pool.len())]
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut rng1 = GameRng::from_seed(42);
        let mut rng2 = GameRng::from_seed(42);

        for _ in 0..100 {
            assert_eq!(rng1.random_f32(), rng2.random_f32());
        }
    }

    #[test]
    fn test_random_range() {
        let mut rng = GameRng::from_seed(123);

        for _ in 0..100 {
            let value = rng.random_range(10.0, 20.0);
            assert!(value >= 10.0, "Value {} should be >= 10.0", value);
            assert!(value < 20.0, "Value {} should be < 20.0", value);
        }
    }

    #[test]
    fn test_random_category_respects_choices() {
        let mut rng = GameRng::from_seed(7);
        let choices = [DamageCategory::Malware, DamageCategory::Phishing];
        for _ in 0..50 {
            assert!(choices.contains(&rng.random_category(&choices)));
        }
    }

    #[test]
    fn test_entropy_rng_has_no_seed() {
        let rng = GameRng::from_entropy();
        assert!(rng.seed.is_none());
    }
}
