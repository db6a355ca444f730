use wsim_core::AgentId;

use crate::{ActionContext, ActionOutcome, ActionProvider, ActionResult, ProviderResult};

/// Lets `minutes` (default 1) pass without doing anything.
pub struct IdleProvider;

impl ActionProvider for IdleProvider {
    fn name(&self) -> &str {
        "idle"
    }

    fn calculate_cost_ms(
        &self,
        _ctx:         &ActionContext<'_>,
        action:       &ActionResult,
        _actor:       AgentId,
        _counterpart: Option<AgentId>,
    ) -> u64 {
        action.param("minutes").unwrap_or(1).max(0) as u64 * 60_000
    }

    fn execute(&self, _ctx: &mut ActionContext<'_>, action: &mut ActionResult) -> ProviderResult<bool> {
        action.steps += 1;
        action.set_outcome(ActionOutcome::Succeeded);
        Ok(false)
    }
}
