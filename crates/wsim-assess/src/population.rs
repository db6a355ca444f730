//! Shared per-location animal population cache.
//!
//! Like the profile cache, entries are only as fresh as their last
//! [`invalidate`](PopulationCache::invalidate); the scheduler clears the
//! whole cache when an increment ends.  Misses are computed outside the lock
//! and inserted first-writer-wins.

use std::sync::{Arc, PoisonError, RwLock};

use wsim_agent::AgentStore;
use wsim_core::{AgentId, LocationId};
use wsim_spatial::Geography;

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

#[derive(Default)]
pub struct PopulationCache {
    animals: RwLock<Map<LocationId, Arc<Vec<AgentId>>>>,
}

impl PopulationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Cached locations.
    pub fn len(&self) -> usize {
        self.animals.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live animals standing in `cell`, in id order.
    pub fn animals_at(&self, cell: LocationId, agents: &AgentStore) -> Arc<Vec<AgentId>> {
        if let Some(hit) = self
            .animals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cell)
        {
            return Arc::clone(hit);
        }
        let fresh: Arc<Vec<AgentId>> = Arc::new(
            agents
                .at_location(cell)
                .filter(|a| a.is_animal() && a.state.alive)
                .map(|a| a.id)
                .collect(),
        );
        let mut map = self.animals.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(cell).or_insert(fresh))
    }

    /// Live animals within `hops` of `origin`, paired with their hop
    /// distance, nearest first.  An unknown origin has no neighbours.
    pub fn animals_near(
        &self,
        geography: &Geography,
        origin:    LocationId,
        hops:      u32,
        agents:    &AgentStore,
    ) -> Vec<(AgentId, u32)> {
        let Ok(cells) = geography.within_hops(origin, hops) else {
            tracing::warn!(cell = %origin, "location not in geography");
            return Vec::new();
        };
        cells
            .into_iter()
            .flat_map(|(cell, d)| {
                self.animals_at(cell, agents)
                    .iter()
                    .map(move |a| (*a, d))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn invalidate(&self, cell: LocationId) -> bool {
        self.animals
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&cell)
            .is_some()
    }

    pub fn clear(&self) {
        self.animals.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl std::fmt::Debug for PopulationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopulationCache").field("locations", &self.len()).finish()
    }
}
