use wsim_agent::Stat;
use wsim_core::{AgentId, Need, Physiological, Safety};
use wsim_rules::stat_check;

use super::actor_location;
use crate::{ActionContext, ActionOutcome, ActionProvider, ActionResult, ProviderError, ProviderResult};

/// Foraging time per unit gathered.
pub const GATHER_MS_PER_UNIT: u64 = 10 * 60 * 1000;

const NEEDS: &[Need] = &[
    Need::Physiological(Physiological::Food),
    Need::Physiological(Physiological::Water),
    Need::Safety(Safety::Resources),
];

/// Forage `quantity` (default 1) units at the actor's cell.
///
/// The need tag picks what is gathered: water for `Water`, food for `Food`,
/// items otherwise.  A perception check decides whether anything is found.
pub struct GatherProvider;

fn quantity(action: &ActionResult) -> u32 {
    action.param("quantity").unwrap_or(1).max(1) as u32
}

impl ActionProvider for GatherProvider {
    fn name(&self) -> &str {
        "gather"
    }

    fn needs(&self) -> &[Need] {
        NEEDS
    }

    fn calculate_cost_ms(
        &self,
        _ctx:         &ActionContext<'_>,
        action:       &ActionResult,
        _actor:       AgentId,
        _counterpart: Option<AgentId>,
    ) -> u64 {
        GATHER_MS_PER_UNIT * quantity(action) as u64
    }

    fn execute(&self, ctx: &mut ActionContext<'_>, action: &mut ActionResult) -> ProviderResult<bool> {
        let cell = actor_location(ctx, action)?;
        let amount = quantity(action);

        let agent = ctx
            .agents
            .get_mut(action.actor)
            .ok_or(ProviderError::UnknownAgent(action.actor))?;
        let found = stat_check(&mut *ctx.rng, agent, Stat::Perception).is_success();
        action.steps += 1;
        if !found {
            tracing::debug!(agent = %action.actor, %cell, "found nothing to gather");
            action.set_outcome(ActionOutcome::Failed);
            return Ok(true);
        }

        let c = &mut agent.circumstances;
        let (field, total) = match action.need {
            Some(Need::Physiological(Physiological::Water)) => {
                c.water += amount;
                ("water", c.water)
            }
            Some(Need::Physiological(Physiological::Food)) => {
                c.food += amount;
                ("food", c.food)
            }
            _ => {
                c.items += amount;
                ("items", c.items)
            }
        };
        ctx.observer.on_state_changed(action.actor, field, &total.to_string());
        action.set_outcome(ActionOutcome::Succeeded);
        Ok(true)
    }
}
