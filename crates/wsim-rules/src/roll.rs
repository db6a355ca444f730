//! Roll engine: percentile rolls, banding, and statistic checks.
//!
//! # Bands
//!
//! Every roll lands in exactly one band:
//!
//! | Roll        | Band                          |
//! |-------------|-------------------------------|
//! | `0..=1`     | catastrophic failure          |
//! | `2..=98`    | compared against a threshold  |
//! | `99..=100`  | natural success               |
//!
//! Statistic checks compare against `stat * 5` and fail on a tie.  Combat,
//! defense, and saving-throw rolls use [`band`], where a roll equal to the
//! threshold succeeds.

use std::cmp::Ordering;

use wsim_agent::{Agent, Stat};
use wsim_core::{Comparator, Outcome, RollSource};

/// Highest roll that is a catastrophic failure.
pub const CATASTROPHIC_MAX: i32 = 1;
/// Lowest roll that is a natural success.
pub const NATURAL_MIN: i32 = 99;
/// Percentile points per statistic point.
pub const STAT_SCALE: i32 = 5;

// ── RollOutcome ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollOutcome {
    CatastrophicFailure,
    Failure,
    Success,
    NaturalSuccess,
    /// The statistic being checked was zero or negative.
    InvalidStatistic,
}

impl RollOutcome {
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, RollOutcome::Success | RollOutcome::NaturalSuccess)
    }

    /// Position on the five-point outcome scale.
    pub fn outcome(self) -> Outcome {
        match self {
            RollOutcome::CatastrophicFailure => Outcome::VeryUnfavorable,
            RollOutcome::Failure             => Outcome::Unfavorable,
            RollOutcome::Success             => Outcome::Favorable,
            RollOutcome::NaturalSuccess      => Outcome::VeryFavorable,
            RollOutcome::InvalidStatistic    => Outcome::Equilibrium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RollOutcome::CatastrophicFailure => "catastrophic_failure",
            RollOutcome::Failure             => "failure",
            RollOutcome::Success             => "success",
            RollOutcome::NaturalSuccess      => "natural_success",
            RollOutcome::InvalidStatistic    => "invalid_statistic",
        }
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Primitives ────────────────────────────────────────────────────────────────

/// Uniform integer in `0..=100`.
#[inline]
pub fn roll_percentage(rng: &mut dyn RollSource) -> i32 {
    rng.percentile()
}

#[inline]
pub fn is_catastrophic_failure(roll: i32) -> bool {
    roll <= CATASTROPHIC_MAX
}

#[inline]
pub fn is_natural_success(roll: i32) -> bool {
    roll >= NATURAL_MIN
}

/// Band a roll against `threshold`; a roll equal to the threshold succeeds.
pub fn band(roll: i32, threshold: i32) -> RollOutcome {
    if is_catastrophic_failure(roll) {
        RollOutcome::CatastrophicFailure
    } else if is_natural_success(roll) {
        RollOutcome::NaturalSuccess
    } else if roll <= threshold {
        RollOutcome::Success
    } else {
        RollOutcome::Failure
    }
}

/// Roll against a raw statistic value on the 20-point scale.  Non-positive
/// values short-circuit to [`RollOutcome::InvalidStatistic`] without
/// drawing.
pub fn roll_stat(rng: &mut dyn RollSource, value: i32) -> RollOutcome {
    if value <= 0 {
        tracing::warn!(value, "statistic is not positive");
        return RollOutcome::InvalidStatistic;
    }
    let threshold = value * STAT_SCALE;
    let roll = rng.percentile();
    let out = if is_catastrophic_failure(roll) {
        RollOutcome::CatastrophicFailure
    } else if is_natural_success(roll) {
        RollOutcome::NaturalSuccess
    } else if roll < threshold {
        RollOutcome::Success
    } else {
        RollOutcome::Failure
    };
    tracing::debug!(roll, threshold, outcome = %out, "stat roll");
    out
}

/// Check one of `agent`'s statistics.
pub fn stat_check(rng: &mut dyn RollSource, agent: &Agent, stat: Stat) -> RollOutcome {
    let value = agent.statistics.get(stat);
    if value <= 0 {
        tracing::warn!(agent = %agent.id, stat = %stat, value, "statistic is not positive");
        return RollOutcome::InvalidStatistic;
    }
    roll_stat(rng, value)
}

pub fn perception_check(rng: &mut dyn RollSource, agent: &Agent) -> RollOutcome {
    stat_check(rng, agent, Stat::Perception)
}

/// Perception scaled by `relativity` in `[0, 1]` (1 = right next to it).
pub fn perception_check_at(rng: &mut dyn RollSource, agent: &Agent, relativity: f64) -> RollOutcome {
    let scaled = (agent.statistics.perception as f64 * relativity.clamp(0.0, 1.0)) as i32;
    roll_stat(rng, scaled)
}

pub fn reaction_check(rng: &mut dyn RollSource, agent: &Agent) -> RollOutcome {
    stat_check(rng, agent, Stat::Reaction)
}

pub fn charisma_check(rng: &mut dyn RollSource, agent: &Agent) -> RollOutcome {
    stat_check(rng, agent, Stat::Charisma)
}

/// Resisting someone else's charisma: the mean of charisma and intelligence.
pub fn counter_charisma_check(rng: &mut dyn RollSource, agent: &Agent) -> RollOutcome {
    roll_stat(rng, agent.statistics.average(&[Stat::Charisma, Stat::Intelligence]))
}

/// Three-way comparison of two scores.
pub fn compare(a: f64, b: f64) -> Comparator {
    match a.total_cmp(&b) {
        Ordering::Less    => Comparator::LessThan,
        Ordering::Equal   => Comparator::Equals,
        Ordering::Greater => Comparator::GreaterThan,
    }
}
