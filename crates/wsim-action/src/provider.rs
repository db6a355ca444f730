//! The `ActionProvider` trait, the context it runs in, and the name-keyed
//! registry the scheduler resolves providers from.

use std::collections::BTreeMap;
use std::sync::Arc;

use wsim_agent::AgentStore;
use wsim_core::{AgentId, Need, RollSource, TimeBox};
use wsim_spatial::Geography;

use crate::{ActionResult, GameObserver, InteractionLog, ProviderResult};

// ── ActionContext ─────────────────────────────────────────────────────────────

/// Everything a provider may read or change while running one action.
///
/// Built by the scheduler for each call; all borrows end with it.
pub struct ActionContext<'a> {
    /// Current simulated time (seconds).
    pub now:          i64,
    /// The actor's realm increment, when the realm clock has one.
    pub increment:    Option<&'a TimeBox>,
    pub agents:       &'a mut AgentStore,
    pub geography:    &'a Geography,
    pub rng:          &'a mut dyn RollSource,
    pub observer:     &'a mut dyn GameObserver,
    pub interactions: &'a mut InteractionLog,
    /// Follow-up actions; the scheduler watches them from the next pass.
    pub spawned:      &'a mut Vec<ActionResult>,
}

impl ActionContext<'_> {
    /// Queue a follow-up action.
    pub fn spawn(&mut self, action: ActionResult) {
        self.spawned.push(action);
    }
}

// ── ActionProvider ────────────────────────────────────────────────────────────

/// One kind of action the scheduler can drive.
///
/// The scheduler calls [`calculate_cost_ms`](Self::calculate_cost_ms), then
/// [`execute`](Self::execute), then [`conclude`](Self::conclude) once per
/// pass for as long as the action stays in progress.  `conclude` owns the
/// move to [`ActionState::Complete`](crate::ActionState::Complete); leaving
/// the action in progress schedules another step.
///
/// Providers are shared between schedulers, so they must be `Send + Sync`
/// and keep per-action state on the [`ActionResult`] itself.
pub trait ActionProvider: Send + Sync {
    /// Registry key; matches [`ActionResult::action`].
    fn name(&self) -> &str;

    /// Needs this action can satisfy.  Default: none.
    fn needs(&self) -> &[Need] {
        &[]
    }

    /// Time the next step of `action` will take.
    fn calculate_cost_ms(
        &self,
        ctx:         &ActionContext<'_>,
        action:      &ActionResult,
        actor:       AgentId,
        counterpart: Option<AgentId>,
    ) -> u64;

    /// Run one step.  Returns whether the step did anything.
    fn execute(&self, ctx: &mut ActionContext<'_>, action: &mut ActionResult) -> ProviderResult<bool>;

    /// Decide whether `action` is finished.
    ///
    /// Default: complete once `execute` has recorded an outcome.
    fn conclude(
        &self,
        _ctx:         &mut ActionContext<'_>,
        action:       &mut ActionResult,
        _actor:       AgentId,
        _counterpart: Option<AgentId>,
    ) -> ProviderResult<()> {
        if let Some(outcome) = action.outcome {
            action.finish(outcome);
        }
        Ok(())
    }
}

// ── ActionRegistry ────────────────────────────────────────────────────────────

/// Name → provider map, resolved once when a scheduler is built.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    providers: BTreeMap<String, Arc<dyn ActionProvider>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in provider.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        crate::providers::register_builtins(&mut reg);
        reg
    }

    /// Register `provider` under its name.  Returns the provider it
    /// replaced, if any.
    pub fn register(&mut self, provider: impl ActionProvider + 'static) -> Option<Arc<dyn ActionProvider>> {
        self.register_arc(Arc::new(provider))
    }

    pub fn register_arc(&mut self, provider: Arc<dyn ActionProvider>) -> Option<Arc<dyn ActionProvider>> {
        let name = provider.name().to_owned();
        let old = self.providers.insert(name.clone(), provider);
        if old.is_some() {
            tracing::info!(provider = %name, "replaced action provider");
        }
        old
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ActionProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Names of the providers tagged with `need`, in name order.
    pub fn candidates(&self, need: Need) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|(_, p)| p.needs().contains(&need))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.providers.keys()).finish()
    }
}
