//! Fluent builder for constructing an `AgentStore` with dense ids.
//!
//! # Usage
//!
//! ```rust
//! use wsim_agent::{Agent, AgentStoreBuilder};
//! use wsim_core::RealmId;
//!
//! let store = AgentStoreBuilder::new()
//!     .agent(Agent::person("Ada", RealmId(0)))
//!     .agent(Agent::animal("wolf", RealmId(0)))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.len(), 2);
//! ```

use wsim_core::AgentId;

use crate::{Agent, AgentError, AgentResult, AgentStore};

/// Fluent builder for [`AgentStore`].
///
/// Agents with an explicit id keep it; agents whose id is `INVALID` fill the
/// remaining slots in insertion order.  The resulting ids are always dense
/// (`0..count`).
#[derive(Default)]
pub struct AgentStoreBuilder {
    agents: Vec<Agent>,
}

impl AgentStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn agents(mut self, agents: impl IntoIterator<Item = Agent>) -> Self {
        self.agents.extend(agents);
        self
    }

    /// Construct the `AgentStore`.
    ///
    /// # Errors
    /// [`AgentError::DuplicateId`] when two agents claim the same id, and
    /// [`AgentError::IdOutOfRange`] when an explicit id is not below the
    /// agent count.
    pub fn build(self) -> AgentResult<AgentStore> {
        let count = self.agents.len();
        let mut slots: Vec<Option<Agent>> = (0..count).map(|_| None).collect();
        let mut unassigned = Vec::new();

        for agent in self.agents {
            if !agent.id.is_valid() {
                unassigned.push(agent);
                continue;
            }
            let slot = slots
                .get_mut(agent.id.index())
                .ok_or(AgentError::IdOutOfRange { id: agent.id, count })?;
            if slot.is_some() {
                return Err(AgentError::DuplicateId(agent.id));
            }
            *slot = Some(agent);
        }

        let mut unassigned = unassigned.into_iter();
        let agents: Vec<Agent> = slots
            .into_iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let mut agent = slot.or_else(|| unassigned.next())?;
                agent.id = AgentId(i as u32);
                Some(agent)
            })
            .collect();

        Ok(AgentStore::from_vec(agents))
    }
}
