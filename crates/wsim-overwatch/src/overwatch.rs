//! The `Overwatch` scheduler and its pass loop.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use wsim_action::{
    ActionContext, ActionRegistry, ActionResult, ActionState, ActionTarget, GameObserver, InteractionLog,
};
use wsim_agent::{Agent, AgentStore};
use wsim_assess::{ImminentThreat, NeedEvaluator, PopulationCache, ThreatEvaluator, ThreatReport, ThreatView};
use wsim_core::{
    ActionResultId, AgentId, ClockId, ClockTree, CoreError, InteractionId, Need, RealmId, RollSource, TimeBox,
    TimeBoxId,
};
use wsim_profile::ProfileCache;
use wsim_spatial::Geography;
use wsim_store::{RecordStore, WriteQueue};

use crate::records::{self, ACTION_KIND, INTERACTION_KIND};
use crate::{
    HookContext, IncrementRule, OverwatchConfig, OverwatchError, OverwatchResult, WatchCategory, WatchHook,
    WatchSet, Watched,
};

// ── ProcessSummary ────────────────────────────────────────────────────────────

/// What one [`Overwatch::process`] call did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub passes:           u32,
    /// Actions that reached `Complete`.
    pub completed:        usize,
    /// Actions pre-empted by a higher-priority action or threat.
    pub rolled_out:       usize,
    /// Actions dropped for an unknown provider, actor, or interaction, or a
    /// provider error.
    pub dropped:          usize,
    pub increments_ended: usize,
}

/// How one step of one action ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    Progressed,
    Completed,
    Dropped,
}

/// Why an action is under pressure from elsewhere.
struct Pressure {
    value:  f64,
    /// Set when an imminent threat, not a competing action, is the
    /// strongest pressure.
    threat: Option<ImminentThreat>,
}

// ── Overwatch ─────────────────────────────────────────────────────────────────

/// Drives watched actions through their providers until none are left.
///
/// One `Overwatch` owns one simulation context: its agents, clocks,
/// interaction log, watch-set, and write queue.  The profile and population
/// caches are `Arc`s and may be shared with other contexts.
///
/// Each pass of [`process`](Self::process):
///
/// 1. **Prune**: merge pending additions; drop finished, rolled-out, and
///    dropped actions from the ACTION list.
/// 2. **Interactions**: announce newly recorded interactions and retire them.
/// 3. **Actions**: for each watched action, roll for pre-emption, then
///    resolve its provider, actor and counterpart, and run one step.
/// 4. **Hooks**: fire raised events; hand group, proximity, time, and
///    response items to the registered [`WatchHook`]s.
/// 5. **Clocks**: advance every realm increment; roll spent increments over.
/// 6. **Flush** queued writes into the record store.
///
/// Create via [`OverwatchBuilder`][crate::OverwatchBuilder].
pub struct Overwatch {
    pub(crate) config:       OverwatchConfig,
    pub(crate) agents:       AgentStore,
    pub(crate) geography:    Geography,
    pub(crate) registry:     ActionRegistry,
    pub(crate) rng:          Box<dyn RollSource + Send>,

    pub(crate) clocks:       ClockTree,
    pub(crate) world_clock:  ClockId,
    pub(crate) realms:       BTreeMap<RealmId, ClockId>,
    pub(crate) increments:   Box<dyn IncrementRule>,
    pub(crate) next_timebox: u64,
    pub(crate) events:       BTreeMap<TimeBoxId, (RealmId, TimeBox)>,

    pub(crate) actions:      BTreeMap<ActionResultId, ActionResult>,
    pub(crate) next_action:  u64,
    pub(crate) interactions: InteractionLog,
    pub(crate) watch:        WatchSet,
    /// Rolled out or dropped this pass; pruned at the next boundary.
    pub(crate) retired:      BTreeSet<ActionResultId>,
    pub(crate) spawned:      Vec<ActionResult>,
    pub(crate) hooks:        Vec<Box<dyn WatchHook>>,

    pub(crate) threats:      BTreeMap<RealmId, ThreatReport>,
    /// Threat interactions a response has already been spawned for.
    pub(crate) responded:    BTreeSet<InteractionId>,
    pub(crate) needs:        NeedEvaluator,
    pub(crate) threat_eval:  ThreatEvaluator,
    pub(crate) profiles:     Arc<ProfileCache>,
    pub(crate) population:   Arc<PopulationCache>,

    pub(crate) store:        Box<dyn RecordStore>,
    pub(crate) queue:        WriteQueue,
}

impl Overwatch {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &OverwatchConfig {
        &self.config
    }

    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    /// Mutable agent access for the owning caller.  Profiles of changed
    /// agents are only refreshed when their next action completes.
    pub fn agents_mut(&mut self) -> &mut AgentStore {
        &mut self.agents
    }

    pub fn geography(&self) -> &Geography {
        &self.geography
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn clocks(&self) -> &ClockTree {
        &self.clocks
    }

    pub fn world_clock(&self) -> ClockId {
        self.world_clock
    }

    pub fn realm_clock(&self, realm: RealmId) -> Option<ClockId> {
        self.realms.get(&realm).copied()
    }

    /// The world clock's cursor (seconds).
    pub fn now(&self) -> i64 {
        self.clocks.get(self.world_clock).map_or(0, |c| c.current())
    }

    pub fn action(&self, id: ActionResultId) -> Option<&ActionResult> {
        self.actions.get(&id)
    }

    /// Every action ever submitted, in id order.
    pub fn actions(&self) -> impl Iterator<Item = &ActionResult> {
        self.actions.values()
    }

    pub fn interactions(&self) -> &InteractionLog {
        &self.interactions
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch
    }

    /// Imminent threats found in `realm` during the current increment.
    pub fn threats(&self, realm: RealmId) -> Option<&ThreatReport> {
        self.threats.get(&realm)
    }

    pub fn profile_cache(&self) -> &Arc<ProfileCache> {
        &self.profiles
    }

    pub fn population_cache(&self) -> &Arc<PopulationCache> {
        &self.population
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn queued_writes(&self) -> usize {
        self.queue.len()
    }

    // ── Intake ────────────────────────────────────────────────────────────

    /// Accept `action`: give it an id, queue its record, and watch it.
    pub fn submit(&mut self, mut action: ActionResult) -> ActionResultId {
        let id = ActionResultId(self.next_action);
        self.next_action += 1;
        action.id = id;
        tracing::debug!(action = %id, name = %action.action, actor = %action.actor, "submitted");
        self.queue.create(records::action_record(&action));
        self.actions.insert(id, action);
        self.watch.watch(WatchCategory::Action, [Watched::Action(id)]);
        id
    }

    pub fn submit_all(&mut self, actions: impl IntoIterator<Item = ActionResult>) -> Vec<ActionResultId> {
        actions.into_iter().map(|a| self.submit(a)).collect()
    }

    /// Watch `items` under `category`.  Already-watched items are skipped.
    /// Returns how many were new.
    pub fn watch(&mut self, category: WatchCategory, items: impl IntoIterator<Item = Watched>) -> usize {
        self.watch.watch(category, items)
    }

    /// Open `event` in `realm`'s clock and watch it; it fires on the next
    /// pass.  The realm's cursor stays in its current increment.
    ///
    /// # Errors
    /// [`CoreError::ClockNotAdvanced`] when `realm` has no clock or its clock
    /// has no increment yet.
    pub fn raise_event(&mut self, realm: RealmId, event: TimeBox) -> OverwatchResult<TimeBoxId> {
        let clock = self.realms.get(&realm).copied().ok_or(CoreError::ClockNotAdvanced { realm: Some(realm) })?;
        self.clocks.active_increment(clock)?;
        self.clocks.set_event(clock, event.clone())?;
        let id = event.id;
        self.events.insert(id, (realm, event));
        self.watch.watch(WatchCategory::Event, [Watched::Event(id)]);
        Ok(id)
    }

    /// Force `id` to `Complete` without running it.
    ///
    /// The action keeps whatever outcome it had.  Only the owner of this
    /// context may call this, and never from inside a pass.
    pub fn cancel(&mut self, id: ActionResultId) -> OverwatchResult<()> {
        let action = self.actions.get_mut(&id).ok_or(OverwatchError::UnknownAction(id))?;
        if action.advance(ActionState::Complete) {
            tracing::info!(action = %id, "cancelled");
            self.queue.update(ACTION_KIND, id.0, records::action_progress(action));
        }
        Ok(())
    }

    // ── Assessment ────────────────────────────────────────────────────────

    /// Run the threat evaluator over `group` in `realm`, remember what it
    /// found until the increment ends, and watch the new interactions.
    pub fn evaluate_threats<O: GameObserver>(
        &mut self,
        realm:    RealmId,
        group:    &[AgentId],
        observer: &mut O,
    ) -> OverwatchResult<&ThreatReport> {
        let clock = self.realms.get(&realm).copied().ok_or(CoreError::ClockNotAdvanced { realm: Some(realm) })?;
        let increment = self.clocks.active_increment(clock)?.clone();
        let first = self.interactions.len();

        let members: Vec<&Agent> = group.iter().filter_map(|id| self.agents.get(*id)).collect();
        let profiles = self.profiles.profiles(&members);
        let view = ThreatView {
            agents:     &self.agents,
            geography:  &self.geography,
            population: &self.population,
            profiles:   &self.profiles,
        };
        let report = self.threat_eval.evaluate_threats(
            realm,
            &increment,
            &profiles,
            view,
            &mut *self.rng,
            observer,
            &mut self.interactions,
        );

        self.record_interactions(first, None);
        let known = self.threats.entry(realm).or_default();
        known.interactions.extend(report.interactions);
        known.imminent.extend(report.imminent);
        Ok(known)
    }

    /// Threats first, then needs: the group's unmet needs as an action
    /// backlog, assigned to members where possible.  Nothing is submitted.
    ///
    /// Needs already targeted by an active action are skipped.
    pub fn recommend<O: GameObserver>(
        &mut self,
        realm:    RealmId,
        group:    &[AgentId],
        observer: &mut O,
    ) -> OverwatchResult<Vec<ActionResult>> {
        self.evaluate_threats(realm, group, observer)?;

        let members: Vec<&Agent> = group.iter().filter_map(|id| self.agents.get(*id)).collect();
        let profiles = self.profiles.profiles(&members);
        let open: BTreeSet<Need> = self
            .actions
            .values()
            .filter(|a| a.is_active() && !self.retired.contains(&a.id))
            .filter_map(|a| a.need)
            .collect();

        let mut backlog = self.needs.evaluate_needs(&profiles, &self.registry, &mut *self.rng, &open);
        self.needs.assign(&mut backlog, &profiles);
        tracing::info!(%realm, members = members.len(), backlog = backlog.len(), "recommended actions");
        Ok(backlog)
    }

    // ── The loop ──────────────────────────────────────────────────────────

    /// Run passes until no action is watched.
    ///
    /// # Errors
    /// - [`OverwatchError::IterationCeiling`] once `max_iterations` passes
    ///   still leave watched actions.
    /// - [`OverwatchError::Clock`] when a realm has no active increment.
    /// - [`OverwatchError::IncrementTooLong`], [`OverwatchError::Store`].
    pub fn process<O: GameObserver>(&mut self, observer: &mut O) -> OverwatchResult<ProcessSummary> {
        let mut summary = ProcessSummary::default();
        loop {
            self.watch.merge();
            self.prune();
            let remaining = self.watch.len(WatchCategory::Action);
            if remaining == 0 {
                break;
            }
            if summary.passes >= self.config.max_iterations {
                tracing::error!(passes = summary.passes, remaining, "iteration ceiling reached");
                return Err(OverwatchError::IterationCeiling { passes: summary.passes, remaining });
            }
            summary.passes += 1;
            self.pass(observer, &mut summary)?;
        }

        // Interactions recorded by the last pass.
        self.watch.merge();
        self.process_interactions(observer);
        self.flush()?;

        tracing::info!(
            passes     = summary.passes,
            completed  = summary.completed,
            rolled_out = summary.rolled_out,
            dropped    = summary.dropped,
            "overwatch processed"
        );
        Ok(summary)
    }

    /// Run one step of `id` outside the loop: cost, execute, conclude.
    ///
    /// Interactions the step records are placed in the actor's current
    /// increment.  Queued writes are flushed.  Returns the action's state
    /// afterwards.
    pub fn process_one<O: GameObserver>(&mut self, id: ActionResultId, observer: &mut O) -> OverwatchResult<ActionState> {
        let mut action = self.actions.remove(&id).ok_or(OverwatchError::UnknownAction(id))?;
        let step = self.step(&mut action, observer, true);
        let state = action.state;
        if step == Step::Dropped {
            self.retired.insert(id);
        }
        self.actions.insert(id, action);
        self.submit_spawned();
        self.flush()?;
        Ok(state)
    }

    /// Retire finished, rolled-out, and dropped actions from the ACTION
    /// list.  Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let actions = &self.actions;
        let retired = &self.retired;
        let removed = self.watch.retain(WatchCategory::Action, |w| match w {
            Watched::Action(id) => match actions.get(id) {
                Some(a) => a.is_active() && !retired.contains(id),
                None => {
                    tracing::warn!(action = %id, "watched action is unknown; dropping");
                    false
                }
            },
            other => {
                tracing::warn!(item = %other, "not an action; dropping from the action list");
                false
            }
        });
        self.retired.clear();
        removed
    }

    /// Apply every queued write to the record store.
    pub fn flush(&mut self) -> OverwatchResult<usize> {
        if self.queue.is_empty() {
            return Ok(0);
        }
        Ok(self.queue.flush(self.store.as_mut())?)
    }

    fn pass(&mut self, observer: &mut dyn GameObserver, summary: &mut ProcessSummary) -> OverwatchResult<()> {
        self.process_interactions(observer);
        self.process_actions(observer, summary);
        self.process_hooks(observer);
        summary.increments_ended += self.synchronize_clocks(observer)?;
        self.flush()?;
        Ok(())
    }

    // ── Interactions ──────────────────────────────────────────────────────

    fn process_interactions(&mut self, observer: &mut dyn GameObserver) {
        let items = self.watch.snapshot(WatchCategory::Interaction);
        if items.is_empty() {
            return;
        }
        for item in &items {
            let Watched::Interaction(id) = item else { continue };
            match self.interactions.get(*id) {
                Some(interaction) => {
                    observer.on_interaction_start(interaction);
                    if interaction.is_resolved() {
                        observer.on_interaction_end(interaction);
                    }
                }
                None => tracing::warn!(interaction = %id, "unknown interaction; dropping"),
            }
        }
        self.watch.retain(WatchCategory::Interaction, |w| !items.contains(w));
    }

    /// Queue records for, and watch, every interaction logged since
    /// `first`.  With `window` set they are first moved into it.
    fn record_interactions(&mut self, first: usize, window: Option<(i64, i64)>) {
        let fresh: Vec<InteractionId> = self.interactions.since(first).collect();
        for id in fresh {
            let Some(interaction) = self.interactions.get_mut(id) else { continue };
            if let Some((start, end)) = window {
                interaction.start = start;
                interaction.end = end.max(start);
            }
            self.queue.create(records::interaction_record(interaction));
            self.watch.watch(WatchCategory::Interaction, [Watched::Interaction(id)]);
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────

    fn process_actions(&mut self, observer: &mut dyn GameObserver, summary: &mut ProcessSummary) {
        let ids: Vec<ActionResultId> = self
            .watch
            .snapshot(WatchCategory::Action)
            .into_iter()
            .filter_map(|w| match w {
                Watched::Action(id) => Some(id),
                _ => None,
            })
            .collect();

        for &id in &ids {
            let Some(action) = self.actions.get(&id) else { continue };
            if !action.is_active() || self.retired.contains(&id) {
                continue;
            }

            if self.rolls_out(id, &ids) {
                summary.rolled_out += 1;
                continue;
            }

            let Some(mut action) = self.actions.remove(&id) else { continue };
            match self.step(&mut action, observer, false) {
                Step::Completed  => summary.completed += 1,
                Step::Progressed => {}
                Step::Dropped    => {
                    summary.dropped += 1;
                    self.retired.insert(id);
                }
            }
            self.actions.insert(id, action);
        }
        self.submit_spawned();
    }

    /// The strongest pull on `id`'s actor away from it: an imminent threat
    /// or another watched action of the same actor.
    fn pressure(&self, id: ActionResultId, watched: &[ActionResultId]) -> Option<Pressure> {
        let action = self.actions.get(&id)?;
        let actor = action.actor;

        let threat = self
            .agents
            .get(actor)
            .and_then(|a| self.threats.get(&a.realm))
            .and_then(|report| {
                report
                    .imminent
                    .iter()
                    .filter(|t| t.agent == actor)
                    .max_by(|a, b| a.priority.total_cmp(&b.priority))
                    .cloned()
            });

        let competing = watched
            .iter()
            .filter(|other| **other != id && !self.retired.contains(*other))
            .filter_map(|other| self.actions.get(other))
            .filter(|a| a.actor == actor && a.is_active())
            .map(|a| a.priority)
            .reduce(f64::max);

        match (threat, competing) {
            (Some(t), Some(c)) if c > t.priority => Some(Pressure { value: c, threat: None }),
            (Some(t), _) => Some(Pressure { value: t.priority, threat: Some(t) }),
            (None, Some(c)) => Some(Pressure { value: c, threat: None }),
            (None, None) => None,
        }
    }

    /// Roll for pre-emption: `(pressure - priority) * dampening` against a
    /// uniform draw.  Nothing is drawn when the chance is not positive.
    fn rolls_out(&mut self, id: ActionResultId, watched: &[ActionResultId]) -> bool {
        let Some(pressure) = self.pressure(id, watched) else { return false };
        let Some(action) = self.actions.get(&id) else { return false };
        let chance = (pressure.value - action.priority) * self.config.rollout_dampening;
        if chance <= 0.0 {
            return false;
        }
        let roll = self.rng.unit();
        if roll >= chance {
            tracing::debug!(action = %id, chance, roll, "held against roll-out");
            return false;
        }

        let actor = action.actor;
        tracing::warn!(action = %id, %actor, chance, roll, "rolled out");
        self.retired.insert(id);
        if let Some(threat) = pressure.threat {
            self.respond(actor, &threat);
        }
        true
    }

    /// Spawn the configured response against the source of `threat`, once
    /// per threat.
    fn respond(&mut self, actor: AgentId, threat: &ImminentThreat) {
        let name = self.config.response_action.as_str();
        if name.is_empty() || !self.responded.insert(threat.interaction) {
            return;
        }
        if !self.registry.contains(name) {
            tracing::warn!(provider = name, "response provider is not registered");
            return;
        }
        self.spawned.push(
            ActionResult::new(name)
                .for_actor(actor)
                .with_target(ActionTarget::Agent(threat.source))
                .with_priority(self.threat_eval.threat_priority),
        );
    }

    /// One step of `action`.  The action must not be in `self.actions`
    /// while this runs.
    fn step(&mut self, action: &mut ActionResult, observer: &mut dyn GameObserver, attach: bool) -> Step {
        let Some(provider) = self.registry.get(&action.action) else {
            let reason = format!("no action provider named {:?}", action.action);
            return self.drop_action(action, observer, &reason);
        };
        let Some(realm) = self.agents.get(action.actor).map(|a| a.realm) else {
            return self.drop_action(action, observer, "actor not found");
        };
        let counterpart = match action.interaction {
            Some(iid) => match self.interactions.get(iid) {
                Some(i) => i.counterpart(action.actor),
                None => return self.drop_action(action, observer, "linked interaction not found"),
            },
            None => action.target.and_then(ActionTarget::agent),
        };

        let clock = self.realms.get(&realm).copied().unwrap_or(self.world_clock);
        let (now, increment) = match self.clocks.get(clock) {
            Ok(c) => (c.current(), c.increment().cloned()),
            Err(_) => (self.now(), None),
        };
        let window = increment.as_ref().filter(|_| attach).map(|i| (i.start, i.end));
        let linked_before = action
            .interaction
            .and_then(|i| self.interactions.get(i))
            .map(|i| i.is_resolved());

        if action.begin() {
            observer.on_action_start(action);
        }

        let first = self.interactions.len();
        let actor = action.actor;
        let result = {
            let mut ctx = ActionContext {
                now,
                increment:    increment.as_ref(),
                agents:       &mut self.agents,
                geography:    &self.geography,
                rng:          &mut *self.rng,
                observer:     &mut *observer,
                interactions: &mut self.interactions,
                spawned:      &mut self.spawned,
            };
            let cost = provider.calculate_cost_ms(&ctx, action, actor, counterpart);
            action.add_cost_ms(cost);
            provider
                .execute(&mut ctx, action)
                .and_then(|_| provider.conclude(&mut ctx, action, actor, counterpart))
        };
        self.record_interactions(first, window);
        self.queue.update(ACTION_KIND, action.id.0, records::action_progress(action));

        if let Err(e) = result {
            return self.drop_action(action, observer, &e.to_string());
        }

        // A linked interaction that existed before the step and resolved
        // during it ends here; new ones are announced by the next pass.
        if let Some(iid) = action.interaction
            && let Some(interaction) = self.interactions.get(iid)
        {
            self.queue.update(INTERACTION_KIND, iid.0, records::interaction_outcome(interaction));
            if linked_before == Some(false) && interaction.is_resolved() {
                observer.on_interaction_end(interaction);
            }
        }

        if action.is_active() {
            tracing::debug!(action = %action.id, steps = action.steps, "in progress");
            observer.on_action_progress(action);
            Step::Progressed
        } else {
            tracing::debug!(action = %action.id, outcome = ?action.outcome, "complete");
            if let Some(agent) = self.agents.get(actor) {
                self.profiles.update(agent);
            }
            observer.on_action_complete(action);
            Step::Completed
        }
    }

    fn drop_action(&mut self, action: &ActionResult, observer: &mut dyn GameObserver, reason: &str) -> Step {
        tracing::warn!(action = %action.id, name = %action.action, actor = %action.actor, reason, "dropping action");
        observer.on_action_error(action, reason);
        Step::Dropped
    }

    fn submit_spawned(&mut self) {
        for action in std::mem::take(&mut self.spawned) {
            self.submit(action);
        }
    }

    // ── Hooks and events ──────────────────────────────────────────────────

    fn process_hooks(&mut self, observer: &mut dyn GameObserver) {
        let events = self.watch.snapshot(WatchCategory::Event);
        for item in &events {
            let Watched::Event(id) = item else { continue };
            match self.events.get(id) {
                Some((realm, event)) => observer.on_event_occurred(*realm, event),
                None => tracing::warn!(event = %id, "unknown event; dropping"),
            }
        }
        self.watch.retain(WatchCategory::Event, |w| !events.contains(w));

        let now = self.now();
        for category in WatchCategory::HOOKED {
            let items = self.watch.snapshot(category);
            if items.is_empty() {
                continue;
            }
            if !self.hooks.iter().any(|h| h.category() == category) {
                tracing::debug!(%category, items = items.len(), "no hook serves this category");
                continue;
            }

            let mut done = Vec::new();
            for item in &items {
                let mut finished = true;
                for hook in self.hooks.iter_mut().filter(|h| h.category() == category) {
                    let mut ctx = HookContext {
                        now,
                        agents:    &self.agents,
                        geography: &self.geography,
                        observer:  &mut *observer,
                        spawned:   &mut self.spawned,
                    };
                    finished &= hook.process(&mut ctx, item);
                }
                if finished {
                    done.push(*item);
                }
            }
            self.watch.retain(category, |w| !done.contains(w));
        }
        self.submit_spawned();
    }

    // ── Clocks ────────────────────────────────────────────────────────────

    /// Advance every realm increment by one pass worth of seconds, ending
    /// the ones that run out.  Returns how many ended.
    fn synchronize_clocks(&mut self, observer: &mut dyn GameObserver) -> OverwatchResult<usize> {
        let secs = self.config.seconds_per_iteration;
        self.clocks.advance(self.world_clock, secs)?;

        let mut ended = 0;
        let realms: Vec<(RealmId, ClockId)> = self.realms.iter().map(|(r, c)| (*r, *c)).collect();
        for (realm, clock) in realms {
            let remaining = self.clocks.active_increment(clock)?.remaining_secs();
            if remaining > self.config.max_increment_secs {
                return Err(OverwatchError::IncrementTooLong {
                    realm,
                    remaining_secs: remaining,
                    max_secs: self.config.max_increment_secs,
                });
            }

            self.clocks.advance(clock, secs)?;
            let increment = self.clocks.active_increment(clock)?.clone();
            observer.on_time_advanced(realm, &increment);
            if increment.remaining_secs() <= 1 {
                self.end_increment(realm, clock, increment, observer)?;
                ended += 1;
            }
        }
        Ok(ended)
    }

    fn end_increment(
        &mut self,
        realm:    RealmId,
        clock:    ClockId,
        ended:    TimeBox,
        observer: &mut dyn GameObserver,
    ) -> OverwatchResult<()> {
        observer.on_increment_end(realm, &ended);

        if let Some(report) = self.threats.remove(&realm) {
            for threat in &report.imminent {
                observer.on_threat_removed(threat.agent, threat.interaction);
            }
            self.responded.retain(|i| !report.interactions.contains(i));
        }
        self.population.clear();

        let id = TimeBoxId(self.next_timebox);
        self.next_timebox += 1;
        let next = self.increments.next_increment(realm, &ended, id).map_err(|e| {
            tracing::error!(%realm, error = %e, "cannot open the next increment");
            e
        })?;
        tracing::info!(%realm, ended = %ended.name, next = %next.name, "increment rolled over");
        self.clocks.set_increment(clock, next)?;
        Ok(())
    }
}

impl std::fmt::Debug for Overwatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overwatch")
            .field("agents", &self.agents.len())
            .field("actions", &self.actions.len())
            .field("watched_actions", &self.watch.len(WatchCategory::Action))
            .field("realms", &self.realms.keys().collect::<Vec<_>>())
            .field("queued_writes", &self.queue.len())
            .finish()
    }
}
