//! Lifecycle notifications.
//!
//! The scheduler, the evaluators, and the providers call into a
//! [`GameObserver`] at fixed moments.  Nothing an observer does feeds back
//! into scheduling: every hook returns `()`.

use wsim_core::{AgentId, InteractionId, LocationId, RealmId, TimeBox};

use crate::{ActionResult, Interaction};

/// Callbacks for every lifecycle moment of the engine.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: move logger
///
/// ```rust,ignore
/// struct MoveLog(Vec<(AgentId, LocationId)>);
///
/// impl GameObserver for MoveLog {
///     fn on_npc_moved(&mut self, agent: AgentId, _from: Option<LocationId>, to: LocationId) {
///         self.0.push((agent, to));
///     }
/// }
/// ```
pub trait GameObserver {
    fn on_action_start(&mut self, _action: &ActionResult) {}

    /// A multi-step action finished a step but is still in progress.
    fn on_action_progress(&mut self, _action: &ActionResult) {}

    fn on_action_complete(&mut self, _action: &ActionResult) {}

    /// The action could not be run this pass.
    fn on_action_error(&mut self, _action: &ActionResult, _error: &str) {}

    fn on_threat_detected(&mut self, _agent: AgentId, _threat: &Interaction) {}

    fn on_threat_removed(&mut self, _agent: AgentId, _threat: InteractionId) {}

    fn on_npc_moved(&mut self, _agent: AgentId, _from: Option<LocationId>, _to: LocationId) {}

    /// An agent acted outside a watched action (a reaction or a spawned
    /// follow-up).
    fn on_npc_action(&mut self, _agent: AgentId, _action: &ActionResult) {}

    fn on_interaction_start(&mut self, _interaction: &Interaction) {}

    fn on_interaction_end(&mut self, _interaction: &Interaction) {}

    /// A realm's active increment moved forward.
    fn on_time_advanced(&mut self, _realm: RealmId, _increment: &TimeBox) {}

    /// A realm's increment ran out; `ended` is the box that just closed.
    fn on_increment_end(&mut self, _realm: RealmId, _ended: &TimeBox) {}

    fn on_event_occurred(&mut self, _realm: RealmId, _event: &TimeBox) {}

    /// Free-form state change on an agent, e.g. `("health", "0.40")`.
    fn on_state_changed(&mut self, _agent: AgentId, _field: &str, _value: &str) {}
}

/// A [`GameObserver`] that does nothing.
pub struct NoopObserver;

impl GameObserver for NoopObserver {}

// ── Notifier ──────────────────────────────────────────────────────────────────

/// Handle returned by [`Notifier::add_handler`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

/// Fan-out observer: forwards every callback to each registered handler in
/// registration order.
#[derive(Default)]
pub struct Notifier {
    handlers: Vec<(HandlerId, Box<dyn GameObserver + Send>)>,
    next_id:  u64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameObserver + Send>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Remove and return the handler registered under `id`.
    pub fn remove_handler(&mut self, id: HandlerId) -> Option<Box<dyn GameObserver + Send>> {
        let pos = self.handlers.iter().position(|(h, _)| *h == id)?;
        Some(self.handlers.remove(pos).1)
    }

    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    pub fn has_handlers(&self) -> bool {
        !self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn each(&mut self, mut f: impl FnMut(&mut dyn GameObserver)) {
        for (_, h) in &mut self.handlers {
            f(h.as_mut());
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").field("handlers", &self.handlers.len()).finish()
    }
}

impl GameObserver for Notifier {
    fn on_action_start(&mut self, action: &ActionResult) {
        self.each(|h| h.on_action_start(action));
    }

    fn on_action_progress(&mut self, action: &ActionResult) {
        self.each(|h| h.on_action_progress(action));
    }

    fn on_action_complete(&mut self, action: &ActionResult) {
        self.each(|h| h.on_action_complete(action));
    }

    fn on_action_error(&mut self, action: &ActionResult, error: &str) {
        self.each(|h| h.on_action_error(action, error));
    }

    fn on_threat_detected(&mut self, agent: AgentId, threat: &Interaction) {
        self.each(|h| h.on_threat_detected(agent, threat));
    }

    fn on_threat_removed(&mut self, agent: AgentId, threat: InteractionId) {
        self.each(|h| h.on_threat_removed(agent, threat));
    }

    fn on_npc_moved(&mut self, agent: AgentId, from: Option<LocationId>, to: LocationId) {
        self.each(|h| h.on_npc_moved(agent, from, to));
    }

    fn on_npc_action(&mut self, agent: AgentId, action: &ActionResult) {
        self.each(|h| h.on_npc_action(agent, action));
    }

    fn on_interaction_start(&mut self, interaction: &Interaction) {
        self.each(|h| h.on_interaction_start(interaction));
    }

    fn on_interaction_end(&mut self, interaction: &Interaction) {
        self.each(|h| h.on_interaction_end(interaction));
    }

    fn on_time_advanced(&mut self, realm: RealmId, increment: &TimeBox) {
        self.each(|h| h.on_time_advanced(realm, increment));
    }

    fn on_increment_end(&mut self, realm: RealmId, ended: &TimeBox) {
        self.each(|h| h.on_increment_end(realm, ended));
    }

    fn on_event_occurred(&mut self, realm: RealmId, event: &TimeBox) {
        self.each(|h| h.on_event_occurred(realm, event));
    }

    fn on_state_changed(&mut self, agent: AgentId, field: &str, value: &str) {
        self.each(|h| h.on_state_changed(agent, field, value));
    }
}
