//! Simulated confidence scoring.
//!
//! Every extracted span gets `min(0.99, 0.75 + u * 0.20 + bonus)` where `u` is a
//! uniform draw from a [`ConfidenceSource`]. Production code draws from the
//! thread RNG, so repeated calls on the same text may keep different entities
//! near the threshold. Tests inject a fixed or seeded source instead.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entity_types::ModelVariant;

pub const BASE_CONFIDENCE: f64 = 0.75;
pub const JITTER_RANGE: f64 = 0.20;
pub const MAX_CONFIDENCE: f64 = 0.99;

/// Source of uniform draws in `[0, 1)`.
pub trait ConfidenceSource {
    fn next_unit(&mut self) -> f64;
}

/// Draws from `rand::thread_rng()`. The default for live requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl ConfidenceSource for ThreadRngSource {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible draws from a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl ConfidenceSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same draw.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub f64);

impl ConfidenceSource for FixedSource {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Cycles through a list of draws. An empty list behaves like `FixedSource(0.0)`.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    draws: Vec<f64>,
    next: usize,
}

impl SequenceSource {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, next: 0 }
    }
}

impl ConfidenceSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self.draws[self.next % self.draws.len()];
        self.next += 1;
        value
    }
}

/// Confidence for a single draw under `model`.
pub fn jittered_confidence(draw: f64, model: ModelVariant) -> f64 {
    let draw = draw.clamp(0.0, 1.0);
    (BASE_CONFIDENCE + draw * JITTER_RANGE + model.bonus()).min(MAX_CONFIDENCE)
}
