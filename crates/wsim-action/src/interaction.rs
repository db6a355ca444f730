//! Dyadic interactions and the per-context interaction log.

use wsim_core::{
    AgentId, Alignment, InteractionId, InteractionKind, Outcome, Polarity, Reason, Role,
    ThreatKind,
};

// ── InteractionSide ───────────────────────────────────────────────────────────

/// One participant's view of an interaction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionSide {
    pub agent:     AgentId,
    pub alignment: Alignment,
    /// What the other side represents to this one.
    pub threat:    ThreatKind,
    pub role:      Role,
    pub reason:    Reason,
    /// Set only by [`Interaction::resolve`].
    pub outcome:   Option<Outcome>,
}

impl InteractionSide {
    pub fn new(agent: AgentId) -> Self {
        Self {
            agent,
            alignment: Alignment::default(),
            threat:    ThreatKind::None,
            role:      Role::Indeterminate,
            reason:    Reason::None,
            outcome:   None,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_threat(mut self, threat: ThreatKind) -> Self {
        self.threat = threat;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_reason(mut self, reason: Reason) -> Self {
        self.reason = reason;
        self
    }
}

// ── Interaction ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    /// Assigned by [`InteractionLog::push`].
    pub id:          InteractionId,
    pub kind:        InteractionKind,
    /// The side that initiated the exchange.
    pub actor:       InteractionSide,
    pub interactor:  InteractionSide,
    pub start:       i64,
    pub end:         i64,
    pub description: String,
}

impl Interaction {
    pub fn new(kind: InteractionKind, actor: InteractionSide, interactor: InteractionSide) -> Self {
        Self {
            id: InteractionId::INVALID,
            kind,
            actor,
            interactor,
            start: 0,
            end: 0,
            description: String::new(),
        }
    }

    /// Set the time window; `end` is clamped to not precede `start`.
    pub fn during(mut self, start: i64, end: i64) -> Self {
        self.start = start;
        self.end = end.max(start);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    pub fn polarity(&self) -> Polarity {
        self.kind.polarity()
    }

    /// Both sides have an outcome.
    pub fn is_resolved(&self) -> bool {
        self.actor.outcome.is_some() && self.interactor.outcome.is_some()
    }

    /// Set both outcomes.  A resolved interaction is immutable: a second
    /// call changes nothing and returns `false`.
    pub fn resolve(&mut self, actor: Outcome, interactor: Outcome) -> bool {
        if self.is_resolved() {
            tracing::debug!(interaction = %self.id, "interaction already resolved");
            return false;
        }
        self.actor.outcome = Some(actor);
        self.interactor.outcome = Some(interactor);
        true
    }

    /// The side `agent` is on, if any.
    pub fn side(&self, agent: AgentId) -> Option<&InteractionSide> {
        if self.actor.agent == agent {
            Some(&self.actor)
        } else if self.interactor.agent == agent {
            Some(&self.interactor)
        } else {
            None
        }
    }

    /// The agent opposite `agent`, if `agent` takes part.
    pub fn counterpart(&self, agent: AgentId) -> Option<AgentId> {
        if self.actor.agent == agent {
            Some(self.interactor.agent)
        } else if self.interactor.agent == agent {
            Some(self.actor.agent)
        } else {
            None
        }
    }

    pub fn involves(&self, agent: AgentId) -> bool {
        self.side(agent).is_some()
    }
}

// ── InteractionLog ────────────────────────────────────────────────────────────

/// Arena of every interaction recorded in one context, indexed by
/// [`InteractionId`].
#[derive(Clone, Debug, Default)]
pub struct InteractionLog {
    entries: Vec<Interaction>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append `interaction`, assigning it the next id.
    pub fn push(&mut self, mut interaction: Interaction) -> InteractionId {
        let id = InteractionId(self.entries.len() as u64);
        interaction.id = id;
        self.entries.push(interaction);
        id
    }

    pub fn get(&self, id: InteractionId) -> Option<&Interaction> {
        if !id.is_valid() {
            return None;
        }
        self.entries.get(id.index())
    }

    pub fn get_mut(&mut self, id: InteractionId) -> Option<&mut Interaction> {
        if !id.is_valid() {
            return None;
        }
        self.entries.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.entries.iter()
    }

    /// Ids of interactions recorded at or after `first`.
    pub fn since(&self, first: usize) -> impl Iterator<Item = InteractionId> + '_ {
        self.entries.iter().skip(first).map(|i| i.id)
    }

    pub fn involving(&self, agent: AgentId) -> impl Iterator<Item = &Interaction> {
        self.entries.iter().filter(move |i| i.involves(agent))
    }
}
