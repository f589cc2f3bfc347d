//! Seeded RNG — Mulberry32, for bit-reproducible epoch processing.
//!
//! Every subsystem that needs randomness (TRADER's accuracy boost, item
//! respawn rolls) draws from an `RngState`, never from `std`'s thread-local
//! randomness, so that two runs of `process_epoch` with the same
//! `(battleId, epoch)` and the same inputs emit byte-identical output.

use serde::{Deserialize, Serialize};

/// RNG stream state: a seed plus a monotonically advancing draw counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u32,
    pub counter: u32,
}

impl RngState {
    pub fn new(seed: u32) -> Self {
        Self { seed, counter: 0 }
    }

    /// Derive the root stream for one epoch from `(battleId, epoch)`, per
    /// the determinism rule in the arena's orchestration contract.
    pub fn for_epoch(battle_id: u64, epoch: u32) -> Self {
        let mixed = (battle_id ^ ((epoch as u64) << 32).wrapping_add(epoch as u64)) as u32;
        Self::new(mixed)
    }

    /// Derive an independent sub-stream scoped to a named subsystem, so
    /// e.g. Prediction's draw order never perturbs Items' draw order.
    pub fn sub_stream(&self, tag: &str) -> Self {
        let mut h: u32 = self.seed ^ self.counter.wrapping_mul(0x9E3779B1);
        for b in tag.bytes() {
            h = h.wrapping_mul(0x01000193) ^ b as u32;
        }
        Self::new(h)
    }

    /// Next random f64 in `[0, 1)`. Advances the counter by 1.
    pub fn next_f64(&mut self) -> f64 {
        self.counter = self.counter.wrapping_add(1);
        mulberry32(self.seed.wrapping_add(self.counter))
    }

    /// Random u32 in `[min, max]` inclusive.
    pub fn next_int(&mut self, min: u32, max: u32) -> u32 {
        let value = self.next_f64();
        min + (value * (max - min + 1) as f64) as u32
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let value = self.next_f64();
            let j = (value * (i + 1) as f64) as usize;
            slice.swap(i, j);
        }
    }

    /// Pick a random index from `[0, len)`. Returns `None` if `len` is 0.
    pub fn random_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.next_int(0, len as u32 - 1) as usize)
    }

    /// Roll true with probability `p` (`p` clamped to `[0, 1]`).
    pub fn roll(&mut self, p: f64) -> bool {
        self.next_f64() < p.clamp(0.0, 1.0)
    }
}

/// Mulberry32 PRNG — fast, good distribution, seedable.
fn mulberry32(input: u32) -> f64 {
    let mut t: i32 = input.wrapping_add(0x6D2B79F5) as i32;

    let lhs = ((t as u32) ^ ((t as u32) >> 15)) as i32;
    let rhs = t | 1;
    t = lhs.wrapping_mul(rhs);

    let lhs2 = ((t as u32) ^ ((t as u32) >> 7)) as i32;
    let rhs2 = t | 61;
    let mul = lhs2.wrapping_mul(rhs2);
    t ^= t.wrapping_add(mul);

    let result = (t as u32) ^ ((t as u32) >> 14);
    result as f64 / 4294967296.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED_42_EXPECTED: [f64; 5] = [
        0.9998110907617956,
        0.8361802322324365,
        0.03719550580717623,
        0.060074036940932274,
        0.62949686544016,
    ];

    #[test]
    fn mulberry32_parity_seed_42() {
        let mut rng = RngState::new(42);
        for (i, &expected) in SEED_42_EXPECTED.iter().enumerate() {
            let actual = rng.next_f64();
            assert!(
                (actual - expected).abs() < 1e-15,
                "seed=42, index={i}: expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn deterministic_same_seed() {
        let mut rng1 = RngState::new(42);
        let mut rng2 = RngState::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.next_f64().to_bits(), rng2.next_f64().to_bits());
        }
    }

    #[test]
    fn for_epoch_is_deterministic() {
        let a = RngState::for_epoch(7, 3);
        let b = RngState::for_epoch(7, 3);
        assert_eq!(a, b);
        let c = RngState::for_epoch(7, 4);
        assert_ne!(a, c);
    }

    #[test]
    fn sub_stream_diverges_by_tag() {
        let root = RngState::for_epoch(1, 1);
        let a = root.sub_stream("prediction");
        let b = root.sub_stream("items");
        assert_ne!(a, b);
    }

    #[test]
    fn values_in_range() {
        let mut rng = RngState::new(12345);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "value {v} out of [0, 1)");
        }
    }

    #[test]
    fn next_int_in_range() {
        let mut rng = RngState::new(999);
        for _ in 0..1000 {
            let v = rng.next_int(3, 7);
            assert!((3..=7).contains(&v), "randomInt {v} out of [3, 7]");
        }
    }

    #[test]
    fn roll_respects_extremes() {
        let mut rng = RngState::new(1);
        assert!(!rng.roll(0.0));
        assert!(rng.roll(1.0));
    }

    #[test]
    fn random_index_empty() {
        let mut rng = RngState::new(42);
        assert_eq!(rng.random_index(0), None);
        assert_eq!(rng.counter, 0);
    }
}
