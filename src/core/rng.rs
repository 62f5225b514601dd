//! Injectable roll source for evasion, critical hits and skill chances

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform rolls in `[0, 1)`
pub trait BattleRng {
    fn roll(&mut self) -> f32;

    /// Roll against a probability. Certain outcomes consume no roll.
    fn chance(&mut self, probability: f32) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.roll() < probability
    }
}

/// ChaCha8-backed generator; reproducible when seeded
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Non-deterministic source for live play
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }
}

impl BattleRng for SeededRng {
    fn roll(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }
}

/// Replays a fixed sequence, then repeats `fallback` forever
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    rolls: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedRng {
    pub fn new(rolls: impl IntoIterator<Item = f32>, fallback: f32) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback,
        }
    }

    /// Every chance below 1.0 fails
    pub fn never() -> Self {
        Self::new([], 0.999_999)
    }

    /// Every chance above 0.0 succeeds
    pub fn always() -> Self {
        Self::new([], 0.0)
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl BattleRng for ScriptedRng {
    fn roll(&mut self) -> f32 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}
