use wsim_core::{AgentId, Need, Outcome, Physiological, ThreatKind};
use wsim_rules::Engagement;

use super::combat::{ensure_interaction, exchange, settle};
use super::{actor_location, engagement, record_armor_wear};
use crate::{
    ActionContext, ActionOutcome, ActionProvider, ActionResult, ActionTarget, ProviderError,
    ProviderResult,
};

pub const HUNT_ROUND_MS: u64 = 60_000;
/// Rounds after which the prey is considered lost.
pub const MAX_HUNT_ROUNDS: u32 = 12;
/// Food units a downed animal yields.
pub const MEAT_PER_KILL: u32 = 3;
/// Damage of the spear a hunter carries when no weapon is given.
pub const SPEAR_DAMAGE: i32 = 10;

const NEEDS: &[Need] = &[Need::Physiological(Physiological::Food)];

/// Hunts the target animal, or the first live animal sharing the actor's
/// cell, one attack per step until it is down.
pub struct HuntProvider;

fn hunting_weapon(action: &ActionResult) -> Engagement {
    if action.param("weapon_damage").is_some() {
        engagement(action)
    } else {
        Engagement::with_weapon(SPEAR_DAMAGE, 0, 1)
    }
}

impl ActionProvider for HuntProvider {
    fn name(&self) -> &str {
        "hunt"
    }

    fn needs(&self) -> &[Need] {
        NEEDS
    }

    fn calculate_cost_ms(
        &self,
        _ctx:         &ActionContext<'_>,
        _action:      &ActionResult,
        _actor:       AgentId,
        _counterpart: Option<AgentId>,
    ) -> u64 {
        HUNT_ROUND_MS
    }

    fn execute(&self, ctx: &mut ActionContext<'_>, action: &mut ActionResult) -> ProviderResult<bool> {
        let here = actor_location(ctx, action)?;
        let hunter = action.actor;

        let prey = match action.target.and_then(ActionTarget::agent) {
            Some(p) => p,
            None => {
                let found = ctx
                    .agents
                    .at_location(here)
                    .find(|a| a.id != hunter && a.is_animal() && a.state.alive)
                    .map(|a| a.id);
                match found {
                    Some(p) => {
                        action.target = Some(ActionTarget::Agent(p));
                        p
                    }
                    None => {
                        tracing::debug!(%hunter, cell = %here, "nothing to hunt");
                        action.set_outcome(ActionOutcome::Failed);
                        return Ok(false);
                    }
                }
            }
        };

        let p = ctx.agents.get(prey).ok_or(ProviderError::UnknownAgent(prey))?;
        if !p.state.alive || p.location() != Some(here) {
            tracing::debug!(%hunter, %prey, "prey got away");
            if let Some(id) = action.interaction {
                settle(ctx, id, Outcome::Unfavorable);
            }
            action.set_outcome(ActionOutcome::Failed);
            return Ok(false);
        }

        let id = ensure_interaction(ctx, action, prey, ThreatKind::AnimalTarget, ThreatKind::PersonalThreat)?;
        let mut weapons = hunting_weapon(action);
        let (_, report) = exchange(ctx, hunter, prey, &mut weapons)?;
        record_armor_wear(action, &weapons);
        action.steps += 1;

        if report.killed || report.incapacitated {
            if let Some(p) = ctx.agents.get_mut(prey) {
                p.state.alive = false;
            }
            ctx.observer.on_state_changed(prey, "alive", "false");
            let h = ctx.agents.get_mut(hunter).ok_or(ProviderError::UnknownAgent(hunter))?;
            h.circumstances.food += MEAT_PER_KILL;
            let food = h.circumstances.food;
            ctx.observer.on_state_changed(hunter, "food", &food.to_string());
            settle(ctx, id, Outcome::VeryFavorable);
            action.set_outcome(ActionOutcome::Succeeded);
        } else if action.steps >= MAX_HUNT_ROUNDS {
            settle(ctx, id, Outcome::Unfavorable);
            action.set_outcome(ActionOutcome::Failed);
        }
        Ok(true)
    }
}
