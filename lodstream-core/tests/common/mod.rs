//! Shared helpers for the integration tests
//!
//! - Deterministic xorshift generator (no external RNG in test data)
//! - Signal shapes that exercise min/max aggregation
//! - Naive reference aggregation to compare pyramid levels against

#![allow(dead_code)]

use lodstream_core::{Entry, Sample};

/// Xorshift32; same seed, same stream on every platform
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16777216.0
    }

    pub fn gen_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Noisy square wave with occasional single-sample spikes
pub fn spiky_square(n: usize, seed: u32) -> Vec<f32> {
    let mut rng = TestRng::new(seed);
    (0..n)
        .map(|i| {
            let base = if (i / 64) % 2 == 0 { -1.0 } else { 1.0 };
            let spike = if rng.next_u32() % 500 == 0 { 25.0 } else { 0.0 };
            base + rng.gen_range(-0.1, 0.1) + spike
        })
        .collect()
}

/// Envelope of `values[k * 2^level .. (k + 1) * 2^level)` for every full block
///
/// Averages are left out: they depend on the pairwise rounding order.
pub fn reference_envelope<T: Sample>(values: &[T], level: u32) -> Vec<(T, T)> {
    let block = 1usize << level;
    values
        .chunks_exact(block)
        .map(|chunk| {
            let mut lo = chunk[0];
            let mut hi = chunk[0];
            for &v in &chunk[1..] {
                lo = T::min_of(lo, v);
                hi = T::max_of(hi, v);
            }
            (lo, hi)
        })
        .collect()
}

pub fn envelope<T: Sample>(entry: &Entry<T>) -> (T, T) {
    (entry.minval, entry.maxval)
}
