//! Fluent builder for constructing an [`Overwatch`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use wsim_action::{ActionRegistry, InteractionLog};
use wsim_agent::AgentStore;
use wsim_assess::{NeedEvaluator, PopulationCache, ThreatEvaluator};
use wsim_core::{ClockTree, RealmId, RollSource, SimRng, TimeBox, TimeBoxId};
use wsim_profile::ProfileCache;
use wsim_spatial::Geography;
use wsim_store::{MemoryStore, RecordStore, WriteQueue};

use crate::{
    HourlyIncrements, IncrementRule, Overwatch, OverwatchConfig, OverwatchError, OverwatchResult, WatchHook,
    WatchSet,
};

/// Fluent builder for [`Overwatch`].
///
/// # Required inputs
///
/// - [`OverwatchConfig`]: seed, ceiling, seconds per pass, …
/// - [`AgentStore`]: the agents of this context
/// - [`Geography`]: the cells they live on
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                   |
/// |--------------------------|-------------------------------------------|
/// | `.registry(r)`           | `ActionRegistry::with_builtins()`         |
/// | `.rolls(r)`              | `SimRng::new(config.seed)`                |
/// | `.epoch(e)`              | one-year epoch from second 0              |
/// | `.realm(r)`              | none; a realm without an increment fails the first pass |
/// | `.increment(r, inc)`     | none                                      |
/// | `.increment_rule(rule)`  | [`HourlyIncrements`]                      |
/// | `.hook(h)`               | none                                      |
/// | `.store(s)`              | [`MemoryStore`]                           |
/// | `.profile_cache(c)`      | a fresh private cache                     |
/// | `.population_cache(c)`   | a fresh private cache                     |
///
/// # Example
///
/// ```rust,ignore
/// let mut overwatch = OverwatchBuilder::new(config, agents, geography)
///     .increment(RealmId(0), TimeBox::hour(TimeBoxId(1), 0))
///     .store(JournalStore::open(Path::new("world.csv"))?)
///     .build()?;
/// overwatch.submit(ActionResult::new("gather").for_actor(AgentId(0)));
/// overwatch.process(&mut NoopObserver)?;
/// ```
pub struct OverwatchBuilder {
    config:         OverwatchConfig,
    agents:         AgentStore,
    geography:      Geography,
    registry:       Option<ActionRegistry>,
    rng:            Option<Box<dyn RollSource + Send>>,
    epoch:          Option<TimeBox>,
    realms:         Vec<(RealmId, Option<TimeBox>)>,
    increment_rule: Option<Box<dyn IncrementRule>>,
    hooks:          Vec<Box<dyn WatchHook>>,
    store:          Option<Box<dyn RecordStore>>,
    profiles:       Option<Arc<ProfileCache>>,
    population:     Option<Arc<PopulationCache>>,
}

impl OverwatchBuilder {
    pub fn new(config: OverwatchConfig, agents: AgentStore, geography: Geography) -> Self {
        Self {
            config,
            agents,
            geography,
            registry:       None,
            rng:            None,
            epoch:          None,
            realms:         Vec::new(),
            increment_rule: None,
            hooks:          Vec::new(),
            store:          None,
            profiles:       None,
            population:     None,
        }
    }

    pub fn registry(mut self, registry: ActionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the seeded roll source, e.g. with scripted rolls.
    pub fn rolls(mut self, rolls: impl RollSource + Send + 'static) -> Self {
        self.rng = Some(Box::new(rolls));
        self
    }

    pub fn epoch(mut self, epoch: TimeBox) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Give `realm` a clock with no increment yet.
    pub fn realm(mut self, realm: RealmId) -> Self {
        self.realms.push((realm, None));
        self
    }

    /// Give `realm` a clock positioned on `increment`.
    pub fn increment(mut self, realm: RealmId, increment: TimeBox) -> Self {
        self.realms.push((realm, Some(increment)));
        self
    }

    pub fn increment_rule(mut self, rule: impl IncrementRule + 'static) -> Self {
        self.increment_rule = Some(Box::new(rule));
        self
    }

    /// Install `hook` and watch its initial items.
    pub fn hook(mut self, hook: impl WatchHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn store(mut self, store: impl RecordStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Share a profile cache with other contexts.
    pub fn profile_cache(mut self, cache: Arc<ProfileCache>) -> Self {
        self.profiles = Some(cache);
        self
    }

    /// Share a population cache with other contexts.
    pub fn population_cache(mut self, cache: Arc<PopulationCache>) -> Self {
        self.population = Some(cache);
        self
    }

    /// Validate the configuration, set up the clocks, and return a ready
    /// [`Overwatch`].
    pub fn build(self) -> OverwatchResult<Overwatch> {
        self.config.validate()?;

        let mut seen = BTreeSet::new();
        for (realm, _) in &self.realms {
            if !seen.insert(*realm) {
                return Err(OverwatchError::Builder(format!("{realm} registered twice")));
            }
        }
        for agent in self.agents.iter() {
            if !seen.contains(&agent.realm) {
                tracing::warn!(agent = %agent.id, realm = %agent.realm, "agent lives in a realm without a clock");
            }
        }

        // ── Clocks ────────────────────────────────────────────────────────
        let epoch = self.epoch.unwrap_or_else(|| TimeBox::epoch(TimeBoxId(0), "epoch 0", 0));
        let mut next_timebox = epoch.id.0;
        let mut clocks = ClockTree::new();
        let world_clock = clocks.add_root(epoch);
        let mut realms = BTreeMap::new();
        for (realm, increment) in self.realms {
            let clock = clocks.realm_clock(world_clock, realm)?;
            if let Some(inc) = increment {
                next_timebox = next_timebox.max(inc.id.0);
                clocks.set_increment(clock, inc)?;
            }
            realms.insert(realm, clock);
        }

        // ── Watch-set seeded by the hooks ─────────────────────────────────
        let mut watch = WatchSet::new();
        for hook in &self.hooks {
            watch.watch(hook.category(), hook.initial());
        }

        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(SimRng::new(self.config.seed)));
        let threat_eval = ThreatEvaluator::new(self.config.threat_hops, self.config.threat_priority);

        Ok(Overwatch {
            agents:       self.agents,
            geography:    self.geography,
            registry:     self.registry.unwrap_or_else(ActionRegistry::with_builtins),
            rng,
            clocks,
            world_clock,
            realms,
            increments:   self.increment_rule.unwrap_or_else(|| Box::new(HourlyIncrements)),
            next_timebox: next_timebox + 1,
            events:       BTreeMap::new(),
            actions:      BTreeMap::new(),
            next_action:  0,
            interactions: InteractionLog::new(),
            watch,
            retired:      BTreeSet::new(),
            spawned:      Vec::new(),
            hooks:        self.hooks,
            threats:      BTreeMap::new(),
            responded:    BTreeSet::new(),
            needs:        NeedEvaluator::new(),
            threat_eval,
            profiles:     self.profiles.unwrap_or_else(ProfileCache::shared),
            population:   self.population.unwrap_or_else(PopulationCache::shared),
            store:        self.store.unwrap_or_else(|| Box::new(MemoryStore::new())),
            queue:        WriteQueue::new(),
            config:       self.config,
        })
    }
}
