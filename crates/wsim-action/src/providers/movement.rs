use wsim_core::{AgentId, LocationId};
use wsim_spatial::SpatialError;

use super::actor_location;
use crate::{
    ActionContext, ActionOutcome, ActionProvider, ActionResult, ActionTarget, ProviderError,
    ProviderResult,
};

/// Walks the actor one hop per step along the shortest route to the target
/// cell, or to the cell the target agent currently stands in.
pub struct MoveProvider;

impl MoveProvider {
    fn destination(ctx: &ActionContext<'_>, action: &ActionResult) -> ProviderResult<LocationId> {
        match action.target {
            Some(ActionTarget::Location(cell)) => Ok(cell),
            Some(ActionTarget::Agent(other)) => ctx
                .agents
                .get(other)
                .ok_or(ProviderError::UnknownAgent(other))?
                .location()
                .ok_or(ProviderError::NoLocation(other)),
            None => Err(ProviderError::MissingTarget(action.id)),
        }
    }

    /// The next cell on the route and the time to reach it.
    fn next_hop(
        ctx:    &ActionContext<'_>,
        from:   LocationId,
        to:     LocationId,
    ) -> Result<Option<(LocationId, u64)>, SpatialError> {
        let route = ctx.geography.route(from, to)?;
        let cells = route.cells(ctx.geography);
        let costs = route.step_costs_ms(ctx.geography);
        Ok(cells.first().copied().zip(costs.first().copied()))
    }
}

impl ActionProvider for MoveProvider {
    fn name(&self) -> &str {
        "move"
    }

    fn calculate_cost_ms(
        &self,
        ctx:          &ActionContext<'_>,
        action:       &ActionResult,
        _actor:       AgentId,
        _counterpart: Option<AgentId>,
    ) -> u64 {
        let (Ok(from), Ok(to)) = (actor_location(ctx, action), Self::destination(ctx, action)) else {
            return 0;
        };
        match Self::next_hop(ctx, from, to) {
            Ok(Some((_, ms))) => ms,
            _ => 0,
        }
    }

    fn execute(&self, ctx: &mut ActionContext<'_>, action: &mut ActionResult) -> ProviderResult<bool> {
        let from = actor_location(ctx, action)?;
        let to = Self::destination(ctx, action)?;
        if from == to {
            action.set_outcome(ActionOutcome::Succeeded);
            return Ok(false);
        }
        if ctx.agents.get(action.actor).is_some_and(|a| !a.state.is_active()) {
            tracing::debug!(agent = %action.actor, "cannot move");
            action.set_outcome(ActionOutcome::Failed);
            return Ok(false);
        }

        let next = match Self::next_hop(ctx, from, to) {
            Ok(Some((cell, _))) => cell,
            Ok(None) => to,
            Err(SpatialError::NoRoute { .. }) => {
                tracing::warn!(agent = %action.actor, %from, %to, "no route; giving up");
                action.set_outcome(ActionOutcome::Failed);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let agent = ctx
            .agents
            .get_mut(action.actor)
            .ok_or(ProviderError::UnknownAgent(action.actor))?;
        agent.state.location = Some(next);
        ctx.observer.on_npc_moved(action.actor, Some(from), next);
        action.steps += 1;
        tracing::debug!(agent = %action.actor, %from, to = %next, step = action.steps, "moved");

        if next == to {
            action.set_outcome(ActionOutcome::Succeeded);
        }
        Ok(true)
    }
}
