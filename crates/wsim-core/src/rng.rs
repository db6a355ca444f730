//! Scheduler-level RNG and the [`RollSource`] seam every stochastic rule
//! draws from.
//!
//! # Determinism strategy
//!
//! Each scheduler owns exactly one roll source, seeded from its
//! configuration.  Two schedulers running side by side never touch each
//! other's state, and a run with the same seed, roster, and submissions
//! replays identically.
//!
//! # Roll sources
//!
//! Rules never call `rand` directly.  They take `&mut dyn RollSource` (or a
//! generic `R: RollSource`), which is implemented by [`SimRng`] and
//! [`ScriptedRolls`].  The latter replays a fixed sequence so a combat
//! exchange or a roll-out decision can be reproduced exactly.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// ── RollSource ────────────────────────────────────────────────────────────────

/// A source of uniformly distributed rolls.
pub trait RollSource {
    /// Uniform integer in `0..=100`.
    fn percentile(&mut self) -> i32;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform index in `0..len`.  `None` when `len == 0`.
    fn index(&mut self, len: usize) -> Option<usize>;
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Seeded scheduler RNG.  Roll-out tests, need-action selection, threat
/// sweeps and combat all draw from the one instance a scheduler owns.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }
}

impl RollSource for SimRng {
    #[inline]
    fn percentile(&mut self) -> i32 {
        self.0.gen_range(0..=100)
    }

    #[inline]
    fn unit(&mut self) -> f64 {
        self.0.r#gen()
    }

    #[inline]
    fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.0.gen_range(0..len))
    }
}

// ── ScriptedRolls ─────────────────────────────────────────────────────────────

/// A [`RollSource`] that replays fixed sequences.
///
/// Once a sequence runs dry it falls back to the midpoint of its range
/// (percentile 50, unit 0.5, index 0), so an under-specified script degrades
/// to unremarkable rolls instead of panicking.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    percentiles: VecDeque<i32>,
    units:       VecDeque<f64>,
    indices:     VecDeque<usize>,
}

impl ScriptedRolls {
    /// Script the percentile rolls, in draw order.
    pub fn new(percentiles: impl IntoIterator<Item = i32>) -> Self {
        Self {
            percentiles: percentiles.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Script the `[0, 1)` draws, in draw order.
    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units = units.into_iter().collect();
        self
    }

    /// Script the index picks, in draw order.  Each value is reduced modulo
    /// the requested length.
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices = indices.into_iter().collect();
        self
    }

    /// Percentile rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.percentiles.len()
    }
}

impl RollSource for ScriptedRolls {
    fn percentile(&mut self) -> i32 {
        self.percentiles.pop_front().unwrap_or(50)
    }

    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.5)
    }

    fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.indices.pop_front().unwrap_or(0) % len)
    }
}
