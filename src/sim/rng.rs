//! Seeded uniform random numbers over inclusive ranges

use rand::distr::uniform::SampleUniform;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// RNG seed wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> GameRng {
        GameRng::new(self.seed)
    }
}

/// Deterministic random source handed to whoever needs randomness
pub struct GameRng {
    inner: Pcg32,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform value in `[min, max]`, both ends inclusive
    ///
    /// Works for every integer width and for floats. Panics if `min > max`.
    pub fn ranged<T>(&mut self, min: T, max: T) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        assert!(min <= max, "empty random range");
        self.inner.random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranged_is_inclusive() {
        let mut rng = GameRng::new(7);
        let mut saw_min = false;
        let mut saw_max = false;
        for _ in 0..1000 {
            let v: u32 = rng.ranged(3, 5);
            assert!((3..=5).contains(&v));
            saw_min |= v == 3;
            saw_max |= v == 5;
        }
        assert!(saw_min && saw_max);
    }

    #[test]
    fn test_ranged_signed_and_float() {
        let mut rng = GameRng::new(11);
        for _ in 0..200 {
            let i: i16 = rng.ranged(-4, 4);
            assert!((-4..=4).contains(&i));
            let f: f32 = rng.ranged(-1.0, 1.0);
            assert!((-1.0..=1.0).contains(&f));
        }
    }

    #[test]
    fn test_single_value_range() {
        let mut rng = GameRng::new(1);
        assert_eq!(rng.ranged(9u8, 9u8), 9);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RngState::new(42).to_rng();
        let mut b = RngState::new(42).to_rng();
        for _ in 0..32 {
            assert_eq!(a.ranged(0u32, 1000), b.ranged(0u32, 1000));
        }
    }

    #[test]
    #[should_panic]
    fn test_empty_range_panics() {
        let mut rng = GameRng::new(1);
        let _ = rng.ranged(5u32, 1u32);
    }
}
