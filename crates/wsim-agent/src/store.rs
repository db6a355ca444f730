//! Agent storage: [`AgentStore`], dense and indexed by [`AgentId`].
//!
//! `AgentId(i)` lives at index `i`, so lookups never hash.

use wsim_core::{AgentId, LocationId, RealmId};

use crate::Agent;

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Dense agent storage indexed by [`AgentId`].
#[derive(Clone, Debug, Default)]
pub struct AgentStore {
    agents: Vec<Agent>,
}

impl AgentStore {
    pub(crate) fn from_vec(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.index())
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        id.index() < self.agents.len()
    }

    /// Append an agent, assigning it the next id.
    pub fn push(&mut self, mut agent: Agent) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        agent.id = id;
        self.agents.push(agent);
        id
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.agents.len() as u32).map(AgentId)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    // ── Filtered views ────────────────────────────────────────────────────

    pub fn in_realm(&self, realm: RealmId) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(move |a| a.realm == realm)
    }

    pub fn at_location(&self, location: LocationId) -> impl Iterator<Item = &Agent> {
        self.agents
            .iter()
            .filter(move |a| a.state.location == Some(location))
    }

    pub fn people(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.is_person())
    }

    pub fn animals(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.is_animal())
    }

    /// Two distinct agents, mutably.  `None` if either is unknown or the ids
    /// are equal.
    pub fn pair_mut(&mut self, a: AgentId, b: AgentId) -> Option<(&mut Agent, &mut Agent)> {
        let (ia, ib) = (a.index(), b.index());
        if ia == ib || ia >= self.agents.len() || ib >= self.agents.len() {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.agents.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.agents.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }
}
