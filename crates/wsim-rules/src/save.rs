//! Saving throws.
//!
//! `base = avg(strength, health, willpower) * 5`, plus a per-kind bonus,
//! minus the difficulty, clamped to `[5, 95]` and rolled with the to-hit
//! bands.

use wsim_agent::Agent;
use wsim_core::RollSource;

use crate::combat::{MAX_HIT_CHANCE, MIN_CHANCE};
use crate::roll::{RollOutcome, band};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SaveKind {
    Death,
    Sickness,
    Poison,
    Magic,
    Fear,
    Stun,
}

/// The clamped chance, in percent, of passing a save.
pub fn save_percent(agent: &Agent, kind: SaveKind, difficulty: i32) -> i32 {
    let s = &agent.statistics;
    let base = ((s.strength + s.health + s.willpower) as f64 / 3.0 * 5.0) as i32;
    let bonus = match kind {
        SaveKind::Death                       => 0,
        SaveKind::Sickness | SaveKind::Poison => s.endurance,
        SaveKind::Magic                       => s.mental_strength / 2,
        SaveKind::Fear                        => (s.wisdom + s.willpower) / 4,
        SaveKind::Stun                        => s.endurance / 2,
    };
    (base + bonus - difficulty).clamp(MIN_CHANCE, MAX_HIT_CHANCE)
}

pub fn roll_saving_throw(
    rng:        &mut dyn RollSource,
    agent:      &Agent,
    kind:       SaveKind,
    difficulty: i32,
) -> RollOutcome {
    let chance = save_percent(agent, kind, difficulty);
    let out = band(rng.percentile(), chance);
    tracing::debug!(agent = %agent.id, ?kind, chance, outcome = %out, "saving throw");
    out
}
