use wsim_core::{AgentId, InteractionId, InteractionKind, Outcome, Role, ThreatKind};
use wsim_rules::{
    CombatResult, DamageReport, Engagement, SaveKind, apply_damage, resolve_combat, roll_saving_throw,
};

use super::{actor_location, engagement, record_armor_wear, target_agent};
use crate::{
    ActionContext, ActionOutcome, ActionProvider, ActionResult, ActionTarget, Interaction,
    InteractionSide, ProviderError, ProviderResult,
};

/// One combat round.
pub const ROUND_MS: u64 = 6_000;
/// Fight instinct at or above which a struck defender strikes back.
pub const COUNTER_FIGHT: f64 = 0.5;

/// Attacks the target agent for `rounds` rounds (default 1), or until it is
/// incapacitated.  A blow that incapacitates forces a death save.
///
/// Armor given as `armor_hp`/`armor_stress`/`armor_absorption` params wears
/// down from round to round and stops shielding once pierced.
///
/// The first round may provoke a counter-attack: a defender that is still
/// active and whose fight instinct reaches [`COUNTER_FIGHT`] gets its own
/// `combat` action against the attacker, sharing the same interaction.
pub struct CombatProvider;

// ── Shared with hunting ───────────────────────────────────────────────────────

/// The interaction `action` belongs to, recording a new combat interaction
/// on the first call.
pub(super) fn ensure_interaction(
    ctx:             &mut ActionContext<'_>,
    action:          &mut ActionResult,
    defender:        AgentId,
    actor_view:      ThreatKind,
    defender_view:   ThreatKind,
) -> ProviderResult<InteractionId> {
    if let Some(id) = action.interaction.filter(|id| ctx.interactions.get(*id).is_some()) {
        return Ok(id);
    }
    let a = ctx.agents.get(action.actor).ok_or(ProviderError::UnknownAgent(action.actor))?;
    let d = ctx.agents.get(defender).ok_or(ProviderError::UnknownAgent(defender))?;
    let until = ctx.increment.map_or(ctx.now, |inc| inc.end);
    let interaction = Interaction::new(
        InteractionKind::Combat,
        InteractionSide::new(a.id)
            .with_alignment(a.alignment)
            .with_threat(actor_view)
            .with_role(Role::Protagonist),
        InteractionSide::new(d.id)
            .with_alignment(d.alignment)
            .with_threat(defender_view)
            .with_role(Role::Antagonist),
    )
    .during(ctx.now, until)
    .describe(format!("{} attacks {}", a.name, d.name));

    let id = ctx.interactions.push(interaction);
    action.interaction = Some(id);
    Ok(id)
}

/// One attack of the actor on `defender`, with damage applied to the
/// defender and its armor.
pub(super) fn exchange(
    ctx:        &mut ActionContext<'_>,
    attacker:   AgentId,
    defender:   AgentId,
    engagement: &mut Engagement,
) -> ProviderResult<(CombatResult, DamageReport)> {
    let (a, d) = ctx
        .agents
        .pair_mut(attacker, defender)
        .ok_or(ProviderError::UnknownAgent(defender))?;
    let result = resolve_combat(&mut *ctx.rng, a, d, engagement);
    let report = apply_damage(d, result.damage_to_target);
    tracing::debug!(%attacker, %defender, "{}", result.description);

    if let Some(armor) = engagement.armor.as_mut()
        && result.damage_to_armor > 0
        && armor.absorb(result.damage_to_armor)
    {
        tracing::debug!(%defender, worn = armor.cumulative_damage, "armor gives way");
    }

    if report.health_after != report.health_before {
        ctx.observer
            .on_state_changed(defender, "health", &format!("{:.2}", report.health_after));
    }
    Ok((result, report))
}

/// Death save forced by a blow that incapacitates without killing, at a
/// difficulty equal to the blow's damage.  Returns whether the defender died.
pub(super) fn death_save(ctx: &mut ActionContext<'_>, defender: AgentId, damage: i32) -> ProviderResult<bool> {
    let d = ctx.agents.get_mut(defender).ok_or(ProviderError::UnknownAgent(defender))?;
    if roll_saving_throw(&mut *ctx.rng, d, SaveKind::Death, damage).is_success() {
        return Ok(false);
    }
    d.state.health = 0.0;
    d.state.alive = false;
    tracing::debug!(%defender, damage, "death save failed");
    ctx.observer.on_state_changed(defender, "alive", "false");
    Ok(true)
}

/// Resolve `id` once; later calls are ignored by the interaction itself.
pub(super) fn settle(ctx: &mut ActionContext<'_>, id: InteractionId, actor: Outcome) {
    if let Some(i) = ctx.interactions.get_mut(id) {
        i.resolve(actor, actor.inverse());
    }
}

// ── Provider ──────────────────────────────────────────────────────────────────

impl ActionProvider for CombatProvider {
    fn name(&self) -> &str {
        "combat"
    }

    fn calculate_cost_ms(
        &self,
        _ctx:         &ActionContext<'_>,
        _action:      &ActionResult,
        _actor:       AgentId,
        _counterpart: Option<AgentId>,
    ) -> u64 {
        ROUND_MS
    }

    fn execute(&self, ctx: &mut ActionContext<'_>, action: &mut ActionResult) -> ProviderResult<bool> {
        let defender = target_agent(action)?;
        let here = actor_location(ctx, action)?;

        let attacker_ready = ctx.agents.get(action.actor).is_some_and(|a| a.state.is_active());
        let d = ctx.agents.get(defender).ok_or(ProviderError::UnknownAgent(defender))?;
        if !d.state.alive {
            action.set_outcome(ActionOutcome::Succeeded);
            return Ok(false);
        }
        if !attacker_ready || d.location() != Some(here) {
            tracing::debug!(attacker = %action.actor, %defender, "target out of reach");
            action.set_outcome(ActionOutcome::Failed);
            return Ok(false);
        }

        let id = ensure_interaction(
            ctx,
            action,
            defender,
            ThreatKind::PhysicalThreat,
            ThreatKind::PhysicalThreat,
        )?;
        let first = action.steps == 0;
        let mut weapons = engagement(action);
        let (result, report) = exchange(ctx, action.actor, defender, &mut weapons)?;
        record_armor_wear(action, &weapons);
        action.steps += 1;
        if result.attack_hit {
            *action.params.entry("hits".to_owned()).or_insert(0) += 1;
        }

        if first && action.param("counter").is_none() && !report.incapacitated {
            let strikes_back = ctx
                .agents
                .get(defender)
                .is_some_and(|d| d.state.is_active() && d.instincts.fight >= COUNTER_FIGHT);
            if strikes_back {
                let counter = ActionResult::new("combat")
                    .for_actor(defender)
                    .with_target(ActionTarget::Agent(action.actor))
                    .with_interaction(id)
                    .with_priority(action.priority)
                    .with_param("counter", 1);
                ctx.observer.on_npc_action(defender, &counter);
                ctx.spawn(counter);
            }
        }

        let killed = report.killed
            || (report.incapacitated && death_save(ctx, defender, result.damage_to_target)?);

        let rounds = action.param("rounds").unwrap_or(1).max(1) as u32;
        if killed || report.incapacitated {
            let o = if killed { Outcome::VeryFavorable } else { Outcome::Favorable };
            settle(ctx, id, o);
            action.set_outcome(ActionOutcome::Succeeded);
        } else if action.steps >= rounds {
            let landed = action.param("hits").unwrap_or(0) > 0;
            let o = if landed { Outcome::Favorable } else { Outcome::Unfavorable };
            settle(ctx, id, o);
            action.set_outcome(if landed { ActionOutcome::Succeeded } else { ActionOutcome::Failed });
        }
        Ok(true)
    }
}
