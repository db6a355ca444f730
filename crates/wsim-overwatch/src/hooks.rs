//! Extension points for the group, proximity, time, and response
//! categories of the watch-set.

use std::collections::BTreeMap;

use wsim_action::{ActionResult, GameObserver};
use wsim_agent::AgentStore;
use wsim_spatial::Geography;

use crate::{WatchCategory, Watched};

/// What a hook may see and do during a pass.
pub struct HookContext<'a> {
    /// Current world time (seconds).
    pub now:       i64,
    pub agents:    &'a AgentStore,
    pub geography: &'a Geography,
    pub observer:  &'a mut dyn GameObserver,
    /// Actions to submit; they are watched from the next pass.
    pub spawned:   &'a mut Vec<ActionResult>,
}

/// Serves one watch category.
///
/// Called once per pass for every active item of [`category`](Self::category).
/// Returning `true` retires the item; `false` keeps it for the next pass.
pub trait WatchHook: Send {
    fn category(&self) -> WatchCategory;

    fn process(&mut self, ctx: &mut HookContext<'_>, item: &Watched) -> bool;

    /// Items to watch when the hook is installed.
    fn initial(&self) -> Vec<Watched> {
        Vec::new()
    }
}

/// Time hook: releases actions once the world clock reaches their time.
///
/// Each distinct time is watched as [`Watched::At`].
#[derive(Debug, Default)]
pub struct ScheduledActions {
    due: BTreeMap<i64, Vec<ActionResult>>,
}

impl ScheduledActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, when: i64, action: ActionResult) -> Self {
        self.due.entry(when).or_default().push(action);
        self
    }

    /// Actions not yet released.
    pub fn len(&self) -> usize {
        self.due.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }
}

impl WatchHook for ScheduledActions {
    fn category(&self) -> WatchCategory {
        WatchCategory::Time
    }

    fn process(&mut self, ctx: &mut HookContext<'_>, item: &Watched) -> bool {
        let Watched::At(when) = *item else { return true };
        if ctx.now < when {
            return false;
        }
        if let Some(actions) = self.due.remove(&when) {
            tracing::debug!(when, count = actions.len(), "releasing scheduled actions");
            ctx.spawned.extend(actions);
        }
        true
    }

    fn initial(&self) -> Vec<Watched> {
        self.due.keys().map(|t| Watched::At(*t)).collect()
    }
}
