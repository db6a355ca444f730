//! Shared, explicitly refreshed profile cache.
//!
//! A cached profile is only as fresh as the last [`ProfileCache::update`]
//! for that agent; nothing is invalidated implicitly.  The cache is meant to
//! be wrapped in an `Arc` and shared by several schedulers.  Reads take a
//! read lock; a miss computes the profile outside the lock and inserts it
//! under the write lock, where the first writer wins.

use std::sync::{Arc, PoisonError, RwLock};

use wsim_agent::Agent;
use wsim_core::AgentId;

use crate::Profile;

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

#[derive(Default)]
pub struct ProfileCache {
    profiles: RwLock<Map<AgentId, Arc<Profile>>>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new cache ready to share between contexts.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        self.profiles.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cached profile for `id`, without computing one.
    pub fn peek(&self, id: AgentId) -> Option<Arc<Profile>> {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// The cached profile for `agent`, computing it on a miss.
    ///
    /// Returns `None` (and logs an error) for an agent without a valid id.
    pub fn get(&self, agent: &Agent) -> Option<Arc<Profile>> {
        if agent.id == AgentId::INVALID {
            tracing::error!(name = %agent.name, "cannot profile an agent without an id");
            return None;
        }
        if let Some(hit) = self.peek(agent.id) {
            return Some(hit);
        }
        let fresh = Arc::new(Profile::from_agent(agent));
        let mut map = self.profiles.write().unwrap_or_else(PoisonError::into_inner);
        Some(map.entry(agent.id).or_insert(fresh).clone())
    }

    /// Recompute `agent`'s profile, keeping its recorded fixations.
    pub fn update(&self, agent: &Agent) -> Option<Arc<Profile>> {
        if agent.id == AgentId::INVALID {
            tracing::error!(name = %agent.name, "cannot profile an agent without an id");
            return None;
        }
        let mut fresh = Profile::from_agent(agent);
        let mut map = self.profiles.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = map.get(&agent.id) {
            fresh.fixations = old.fixations.clone();
        }
        let fresh = Arc::new(fresh);
        map.insert(agent.id, Arc::clone(&fresh));
        Some(fresh)
    }

    /// Drop `id`'s profile.  Returns whether one was cached.
    pub fn invalidate(&self, id: AgentId) -> bool {
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    pub fn clear(&self) {
        self.profiles.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Record that `source` is fixated on `target`.  Returns `false` when
    /// `source` has no cached profile.
    pub fn add_fixation(&self, source: AgentId, target: AgentId) -> bool {
        let mut map = self.profiles.write().unwrap_or_else(PoisonError::into_inner);
        match map.get_mut(&source) {
            Some(profile) => {
                Arc::make_mut(profile).fixations.insert(target);
                true
            }
            None => false,
        }
    }

    pub fn fixations(&self, id: AgentId) -> Vec<AgentId> {
        self.peek(id)
            .map(|p| p.fixations.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Profiles for every agent in `agents`, in order.  Agents that cannot
    /// be profiled are skipped.
    ///
    /// With the `parallel` feature the misses are computed on Rayon's
    /// thread pool.
    pub fn profiles(&self, agents: &[&Agent]) -> Vec<Arc<Profile>> {
        #[cfg(not(feature = "parallel"))]
        {
            agents.iter().filter_map(|a| self.get(a)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            agents.par_iter().filter_map(|a| self.get(a)).collect()
        }
    }
}

impl std::fmt::Debug for ProfileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCache").field("len", &self.len()).finish()
    }
}
