//! `ActionResult`: one agent's attempt at one action.

use std::collections::BTreeMap;

use wsim_core::{ActionResultId, AgentId, InteractionId, LocationId, Need};

// ── ActionState ───────────────────────────────────────────────────────────────

/// Lifecycle of an action.  Only ever moves forward.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionState {
    #[default]
    Pending,
    InProgress,
    Complete,
}

impl ActionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionState::Pending    => "pending",
            ActionState::InProgress => "in_progress",
            ActionState::Complete   => "complete",
        }
    }

    /// `Pending` or `InProgress`.
    #[inline]
    pub fn is_active(self) -> bool {
        self != ActionState::Complete
    }
}

impl std::fmt::Display for ActionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a completed action turned out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    Succeeded,
    Failed,
}

impl ActionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionOutcome::Succeeded => "succeeded",
            ActionOutcome::Failed    => "failed",
        }
    }
}

// ── ActionTarget ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionTarget {
    Location(LocationId),
    Agent(AgentId),
}

impl ActionTarget {
    pub fn agent(self) -> Option<AgentId> {
        match self {
            ActionTarget::Agent(a) => Some(a),
            ActionTarget::Location(_) => None,
        }
    }

    pub fn location(self) -> Option<LocationId> {
        match self {
            ActionTarget::Location(l) => Some(l),
            ActionTarget::Agent(_) => None,
        }
    }
}

// ── ActionResult ──────────────────────────────────────────────────────────────

/// A scheduled or finished action.
///
/// Records are never deleted.  Once `state` reaches
/// [`ActionState::Complete`] the scheduler stops watching them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionResult {
    /// `ActionResultId::INVALID` until the scheduler accepts the action.
    pub id:          ActionResultId,
    /// Name of the [`ActionProvider`](crate::ActionProvider) that drives it.
    pub action:      String,
    pub state:       ActionState,
    pub outcome:     Option<ActionOutcome>,
    /// `AgentId::INVALID` while nobody has been assigned.
    pub actor:       AgentId,
    pub interaction: Option<InteractionId>,
    pub need:        Option<Need>,
    pub target:      Option<ActionTarget>,
    /// In `[0, 1]`.
    pub priority:    f64,
    /// Accumulated time cost.
    pub cost_ms:     u64,
    /// Completed steps of a multi-step action.
    pub steps:       u32,
    /// Provider-specific integer parameters (`"quantity"`, `"rounds"`, …).
    pub params:      BTreeMap<String, i64>,
}

impl ActionResult {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            id:          ActionResultId::INVALID,
            action:      action.into(),
            state:       ActionState::Pending,
            outcome:     None,
            actor:       AgentId::INVALID,
            interaction: None,
            need:        None,
            target:      None,
            priority:    0.0,
            cost_ms:     0,
            steps:       0,
            params:      BTreeMap::new(),
        }
    }

    pub fn for_actor(mut self, actor: AgentId) -> Self {
        self.actor = actor;
        self
    }

    pub fn with_need(mut self, need: Need) -> Self {
        self.need = Some(need);
        self
    }

    pub fn with_target(mut self, target: ActionTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Clamped to `[0, 1]`.
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority.clamp(0.0, 1.0);
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionId) -> Self {
        self.interaction = Some(interaction);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: i64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    pub fn param(&self, name: &str) -> Option<i64> {
        self.params.get(name).copied()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.actor.is_valid()
    }

    /// Move to `to`.  Moving backwards is refused (logged) and returns
    /// `false`; staying put is a no-op that returns `true`.
    pub fn advance(&mut self, to: ActionState) -> bool {
        if to < self.state {
            tracing::warn!(
                action = %self.id,
                from = %self.state,
                to = %to,
                "refusing to move action state backwards"
            );
            return false;
        }
        self.state = to;
        true
    }

    /// `Pending → InProgress`.  Returns `true` only on that transition.
    pub fn begin(&mut self) -> bool {
        if self.state != ActionState::Pending {
            return false;
        }
        self.state = ActionState::InProgress;
        true
    }

    /// Record how the action turned out without completing it; the
    /// provider's `conclude` completes it.
    pub fn set_outcome(&mut self, outcome: ActionOutcome) {
        self.outcome = Some(outcome);
    }

    /// Complete with `outcome`.
    pub fn finish(&mut self, outcome: ActionOutcome) -> bool {
        self.outcome = Some(outcome);
        self.advance(ActionState::Complete)
    }

    pub fn add_cost_ms(&mut self, ms: u64) {
        self.cost_ms = self.cost_ms.saturating_add(ms);
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == Some(ActionOutcome::Succeeded)
    }
}
