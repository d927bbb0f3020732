//! Injectable random source
//!
//! Spawn timing, spawn positions and burst styles all draw from a `Random`.
//! The engine uses a seeded `Pcg32`; tests can replay a fixed sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform samples
pub trait Random {
    /// Uniform sample in [0, 1)
    fn unit(&mut self) -> f32;

    /// Uniform sample in [lo, hi)
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }

    /// Uniform millisecond interval in [lo, hi)
    fn interval(&mut self, (lo, hi): (f64, f64)) -> f64 {
        lo + (hi - lo) * self.unit() as f64
    }

    /// Uniform index in [0, n)
    fn index(&mut self, n: usize) -> usize {
        ((self.unit() * n as f32) as usize).min(n.saturating_sub(1))
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }
}

impl Random for Pcg32 {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded generator used by the engine
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Cycles through a fixed list of samples. An empty list always yields 0.
#[derive(Debug, Clone)]
pub struct ReplayRandom {
    samples: Vec<f32>,
    cursor: usize,
}

impl ReplayRandom {
    pub fn new(samples: Vec<f32>) -> Self {
        let samples = samples
            .into_iter()
            .map(|s| s.clamp(0.0, 0.999_999))
            .collect();
        Self { samples, cursor: 0 }
    }

    /// Always returns the same sample
    pub fn constant(sample: f32) -> Self {
        Self::new(vec![sample])
    }
}

impl Random for ReplayRandom {
    fn unit(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let s = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        s
    }
}
