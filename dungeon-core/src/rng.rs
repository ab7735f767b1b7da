//! Seedable random provider.
//!
//! Every random decision in generation, placement, combat and loot goes
//! through [`GameRng`], so a fixed seed reproduces a whole run.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// Thin wrapper over a xoshiro256++ generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRng {
    inner: Xoshiro256PlusPlus,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// `None` draws the seed from OS entropy (non-deterministic run).
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self {
                inner: Xoshiro256PlusPlus::from_entropy(),
            },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.gen()
    }

    /// Uniform integer in `[lo, hi]`. A reversed range collapses to `lo`.
    pub fn range_inclusive<T>(&mut self, lo: T, hi: T) -> T
    where
        T: rand::distributions::uniform::SampleUniform + PartialOrd + Copy,
    {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// Uniform float in `[0, 1)`.
    pub fn roll_f32(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// True with probability `p` (clamped to [0, 1]).
    pub fn chance(&mut self, p: f32) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.inner.gen_bool(p as f64)
    }

    pub fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    /// Up to `amount` distinct elements, in random order.
    pub fn sample<T: Clone>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        items
            .choose_multiple(&mut self.inner, amount.min(items.len()))
            .cloned()
            .collect()
    }

    /// Weighted pick; non-positive weights are never chosen.
    pub fn weighted_choice<T: Copy>(&mut self, table: &[(T, f32)]) -> Option<T> {
        let total: f32 = table.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.roll_f32() * total;
        for (value, weight) in table {
            let weight = weight.max(0.0);
            if weight <= 0.0 {
                continue;
            }
            if roll < weight {
                return Some(*value);
            }
            roll -= weight;
        }
        // float drift: fall back to the last positive entry
        table.iter().rev().find(|(_, w)| *w > 0.0).map(|(v, _)| *v)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = GameRng::seeded(7);
        let mut b = GameRng::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let mut rng = GameRng::seeded(1);
        for _ in 0..500 {
            let v = rng.range_inclusive(3, 6);
            assert!((3..=6).contains(&v));
        }
        assert_eq!(rng.range_inclusive(9, 2), 9, "reversed range collapses to lo");
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = GameRng::seeded(3);
        assert!((0..100).all(|_| rng.chance(1.0)));
        assert!((0..100).all(|_| !rng.chance(0.0)));
        assert!(!rng.chance(f32::NAN));
    }

    #[test]
    fn test_weighted_choice_skips_zero_weight() {
        let mut rng = GameRng::seeded(11);
        let table = [("never", 0.0), ("always", 5.0)];
        for _ in 0..100 {
            assert_eq!(rng.weighted_choice(&table), Some("always"));
        }
        assert_eq!(rng.weighted_choice::<u8>(&[]), None);
    }

    #[test]
    fn test_sample_distinct() {
        let mut rng = GameRng::seeded(5);
        let picked = rng.sample(&[1, 2, 3, 4, 5], 3);
        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert_eq!(rng.sample(&[1, 2], 10).len(), 2);
    }

    #[test]
    fn test_choose_empty() {
        let mut rng = GameRng::seeded(5);
        let empty: [u32; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}
