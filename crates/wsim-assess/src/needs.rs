//! Turn a group's unmet needs into a prioritised action backlog.

use std::collections::BTreeSet;
use std::sync::Arc;

use wsim_action::{ActionRegistry, ActionResult};
use wsim_core::{AgentId, Need, NeedCategory, RollSource};
use wsim_profile::{GroupProfile, Profile};

/// Weight of each need category in an action's priority.
pub fn category_weight(category: NeedCategory) -> f64 {
    match category {
        NeedCategory::Physiological => 0.7,
        NeedCategory::Safety        => 0.5,
        NeedCategory::Love          => 0.3,
        NeedCategory::Esteem        => 0.2,
    }
}

/// Builds one unassigned, pending action per unmet group need that some
/// registered provider can address.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeedEvaluator;

impl NeedEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Walk the group's needs in priority order (physiological, safety,
    /// love, esteem; most common first within a category).
    ///
    /// Needs in `open` are already being addressed and are skipped.  A need
    /// no provider is tagged with is skipped silently; when several
    /// providers qualify one is picked with `rng`.  Each action's priority is
    /// its category weight times the share of the group with the need.
    pub fn evaluate_needs(
        &self,
        profiles: &[Arc<Profile>],
        registry: &ActionRegistry,
        rng:      &mut dyn RollSource,
        open:     &BTreeSet<Need>,
    ) -> Vec<ActionResult> {
        let group = GroupProfile::from_profiles(profiles.iter().map(|p| p.as_ref()));
        let mut backlog = Vec::new();

        for (need, _) in group.priorities() {
            if open.contains(&need) {
                tracing::debug!(%need, "need already being addressed");
                continue;
            }
            let candidates = registry.candidates(need);
            let Some(pick) = rng.index(candidates.len()) else {
                continue;
            };
            let priority = category_weight(need.category()) * group.share(need);
            backlog.push(
                ActionResult::new(candidates[pick])
                    .with_need(need)
                    .with_priority(priority),
            );
        }
        backlog
    }

    /// Give each unassigned action in `backlog` to a living member with its
    /// need, at most one action per member, in backlog order.  Actions no
    /// free member can take stay unassigned.
    pub fn assign(&self, backlog: &mut [ActionResult], profiles: &[Arc<Profile>]) {
        let mut busy: BTreeSet<AgentId> = backlog.iter().map(|a| a.actor).filter(|a| a.is_valid()).collect();
        for action in backlog.iter_mut().filter(|a| !a.is_assigned()) {
            let Some(need) = action.need else { continue };
            let member = profiles
                .iter()
                .find(|p| p.alive && p.has_need(need) && !busy.contains(&p.id));
            if let Some(p) = member {
                busy.insert(p.id);
                action.actor = p.id;
            }
        }
    }
}
