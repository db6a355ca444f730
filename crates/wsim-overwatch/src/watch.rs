//! The watch-set: what the scheduler is keeping an eye on, by category.
//!
//! Each pass iterates a snapshot of the active lists.  Anything watched
//! while a pass runs (a counter-attack spawned by a provider, an interaction
//! recorded by a threat check) lands in a pending buffer and joins the
//! active lists at the next [`merge`](WatchSet::merge), so a pass never sees
//! its own additions.

use std::collections::BTreeMap;
use std::fmt;

use wsim_core::{ActionResultId, AgentId, InteractionId, LocationId, RealmId, TimeBoxId};

#[cfg(feature = "fx-hash")]
type Set<T> = rustc_hash::FxHashSet<T>;
#[cfg(not(feature = "fx-hash"))]
type Set<T> = std::collections::HashSet<T>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WatchCategory {
    Action,
    Interaction,
    Event,
    Time,
    Proximity,
    Group,
    Response,
}

impl WatchCategory {
    pub const ALL: [WatchCategory; 7] = [
        WatchCategory::Action,
        WatchCategory::Interaction,
        WatchCategory::Event,
        WatchCategory::Time,
        WatchCategory::Proximity,
        WatchCategory::Group,
        WatchCategory::Response,
    ];

    /// Categories served by registered [`WatchHook`](crate::WatchHook)s.
    pub const HOOKED: [WatchCategory; 4] = [
        WatchCategory::Group,
        WatchCategory::Proximity,
        WatchCategory::Time,
        WatchCategory::Response,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WatchCategory::Action      => "action",
            WatchCategory::Interaction => "interaction",
            WatchCategory::Event       => "event",
            WatchCategory::Time        => "time",
            WatchCategory::Proximity   => "proximity",
            WatchCategory::Group       => "group",
            WatchCategory::Response    => "response",
        }
    }
}

impl fmt::Display for WatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a watched entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Watched {
    Action(ActionResultId),
    Interaction(InteractionId),
    Event(TimeBoxId),
    Agent(AgentId),
    Location(LocationId),
    Realm(RealmId),
    /// A point in simulated time (seconds).
    At(i64),
}

impl fmt::Display for Watched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Watched::Action(id)      => write!(f, "{id}"),
            Watched::Interaction(id) => write!(f, "{id}"),
            Watched::Event(id)       => write!(f, "{id}"),
            Watched::Agent(id)       => write!(f, "{id}"),
            Watched::Location(id)    => write!(f, "{id}"),
            Watched::Realm(id)       => write!(f, "{id}"),
            Watched::At(t)           => write!(f, "t={t}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct WatchSet {
    active:  BTreeMap<WatchCategory, Vec<Watched>>,
    pending: Vec<(WatchCategory, Watched)>,
    /// Everything in `active` or `pending`.
    members: Set<(WatchCategory, Watched)>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `items` under `category`, skipping any already watched there.
    /// Returns how many were new.
    pub fn watch(&mut self, category: WatchCategory, items: impl IntoIterator<Item = Watched>) -> usize {
        let mut added = 0;
        for item in items {
            if !self.members.insert((category, item)) {
                tracing::info!(%category, %item, "already watched");
                continue;
            }
            self.pending.push((category, item));
            added += 1;
        }
        added
    }

    pub fn is_watched(&self, category: WatchCategory, item: Watched) -> bool {
        self.members.contains(&(category, item))
    }

    /// Move pending additions into the active lists.
    pub fn merge(&mut self) -> usize {
        let n = self.pending.len();
        for (category, item) in self.pending.drain(..) {
            self.active.entry(category).or_default().push(item);
        }
        n
    }

    /// Active items of `category`, in watch order.
    pub fn snapshot(&self, category: WatchCategory) -> Vec<Watched> {
        self.active.get(&category).cloned().unwrap_or_default()
    }

    /// Keep the active items of `category` for which `keep` holds.
    /// Returns how many were dropped.
    pub fn retain(&mut self, category: WatchCategory, mut keep: impl FnMut(&Watched) -> bool) -> usize {
        let Some(list) = self.active.get_mut(&category) else { return 0 };
        let before = list.len();
        let members = &mut self.members;
        list.retain(|item| {
            let k = keep(item);
            if !k {
                members.remove(&(category, *item));
            }
            k
        });
        before - list.len()
    }

    /// Stop watching `item`, wherever it is.  Returns whether it was watched.
    pub fn unwatch(&mut self, category: WatchCategory, item: Watched) -> bool {
        if !self.members.remove(&(category, item)) {
            return false;
        }
        if let Some(list) = self.active.get_mut(&category) {
            list.retain(|w| *w != item);
        }
        self.pending.retain(|(c, w)| !(*c == category && *w == item));
        true
    }

    /// Active items of `category`.
    pub fn len(&self, category: WatchCategory) -> usize {
        self.active.get(&category).map_or(0, Vec::len)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// `true` when nothing is active or pending in any category.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
