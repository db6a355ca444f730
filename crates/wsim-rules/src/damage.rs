//! Converting absolute damage into fractional health loss.

use wsim_agent::Agent;

/// Maximum health assumed when an agent's record has none.
pub const DEFAULT_MAX_HEALTH: i32 = 10;
/// Health fraction at or below which an agent is incapacitated.
pub const INCAPACITATED_AT: f64 = 0.1;

/// What one call to [`apply_damage`] did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DamageReport {
    pub health_before: f64,
    pub health_after:  f64,
    pub incapacitated: bool,
    pub killed:        bool,
}

/// Subtract `amount / (max_health * 5)` from the agent's health fraction.
///
/// Non-positive amounts change nothing.  Health floors at zero; the agent is
/// marked incapacitated at or below 0.1 and dead at zero.
pub fn apply_damage(agent: &mut Agent, amount: i32) -> DamageReport {
    let before = agent.state.health;
    if amount <= 0 {
        return DamageReport {
            health_before: before,
            health_after:  before,
            incapacitated: false,
            killed:        false,
        };
    }

    let mut max_health = agent.statistics.maximum_health;
    if max_health <= 0 {
        tracing::warn!(agent = %agent.id, "no maximum health; assuming {DEFAULT_MAX_HEALTH}");
        max_health = DEFAULT_MAX_HEALTH;
    }

    let loss = amount as f64 / (max_health as f64 * 5.0);
    let after = (before - loss).max(0.0);
    agent.state.health = after;

    let incapacitated = after <= INCAPACITATED_AT && !agent.state.incapacitated;
    if after <= INCAPACITATED_AT {
        agent.state.incapacitated = true;
    }
    let killed = after <= 0.0 && agent.state.alive;
    if after <= 0.0 {
        agent.state.alive = false;
    }

    tracing::debug!(agent = %agent.id, amount, before, after, "damage applied");
    DamageReport { health_before: before, health_after: after, incapacitated, killed }
}
