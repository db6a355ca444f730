use wsim_core::{AgentId, Need, Physiological, Safety};

use super::actor_location;
use crate::{ActionContext, ActionOutcome, ActionProvider, ActionResult, ProviderError, ProviderResult};

pub const BUILD_STEPS: u32 = 4;
pub const BUILD_STEP_MS: u64 = 15 * 60 * 1000;

const NEEDS: &[Need] = &[
    Need::Physiological(Physiological::Shelter),
    Need::Safety(Safety::Property),
];

/// Builds a dwelling at the actor's cell over `steps` steps (default
/// [`BUILD_STEPS`]).  The finished cell becomes the actor's home and joins
/// its owned locations.
pub struct BuildProvider;

fn required_steps(action: &ActionResult) -> u32 {
    action.param("steps").map_or(BUILD_STEPS, |s| s.max(1) as u32)
}

impl ActionProvider for BuildProvider {
    fn name(&self) -> &str {
        "build"
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
        BUILD_STEP_MS
    }

    fn execute(&self, ctx: &mut ActionContext<'_>, action: &mut ActionResult) -> ProviderResult<bool> {
        let cell = actor_location(ctx, action)?;
        action.steps += 1;
        if action.steps < required_steps(action) {
            return Ok(true);
        }

        let agent = ctx
            .agents
            .get_mut(action.actor)
            .ok_or(ProviderError::UnknownAgent(action.actor))?;
        agent.circumstances.home = Some(cell);
        if !agent.circumstances.owned_locations.contains(&cell) {
            agent.circumstances.owned_locations.push(cell);
        }
        ctx.observer.on_state_changed(action.actor, "home", &cell.to_string());
        action.set_outcome(ActionOutcome::Succeeded);
        Ok(true)
    }
}
