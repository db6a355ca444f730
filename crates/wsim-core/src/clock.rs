//! Hierarchical clocks.
//!
//! A [`Clock`] is a cursor `start <= current <= end` that may carry the
//! epoch, event, and increment it is currently positioned in.  Clocks form a
//! tree: a world clock owns one child per realm, and each realm clock can
//! push ("tap") its event/increment/realm context up to every ancestor so the
//! world clock always reflects the most recently active realm.
//!
//! Clocks live in a [`ClockTree`] arena and refer to each other by
//! [`ClockId`], which sidesteps shared mutable parent pointers entirely.
//!
//! ```text
//! world (epoch)
//!  ├── realm 1 ── set_increment ─┐
//!  └── realm 2                   │ tap: copy event/increment/realm upward
//!        ▲───────────────────────┘
//! ```

use std::collections::HashMap;

use crate::time::{SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE};
use crate::{ClockId, CoreError, CoreResult, RealmId, TimeBox};

// ── Clock ─────────────────────────────────────────────────────────────────────

/// One node of a [`ClockTree`].
#[derive(Clone, Debug)]
pub struct Clock {
    start:   i64,
    current: i64,
    end:     i64,

    epoch:     Option<TimeBox>,
    event:     Option<TimeBox>,
    increment: Option<TimeBox>,
    realm:     Option<RealmId>,

    parent:       Option<ClockId>,
    realm_clocks: HashMap<RealmId, ClockId>,
}

impl Clock {
    fn from_window(start: i64, current: i64, end: i64, parent: Option<ClockId>) -> Self {
        Self {
            start,
            current,
            end,
            epoch:        None,
            event:        None,
            increment:    None,
            realm:        None,
            parent,
            realm_clocks: HashMap::new(),
        }
    }

    #[inline] pub fn start(&self) -> i64 { self.start }
    #[inline] pub fn current(&self) -> i64 { self.current }
    #[inline] pub fn end(&self) -> i64 { self.end }

    pub fn epoch(&self) -> Option<&TimeBox> { self.epoch.as_ref() }
    pub fn event(&self) -> Option<&TimeBox> { self.event.as_ref() }
    pub fn increment(&self) -> Option<&TimeBox> { self.increment.as_ref() }
    pub fn realm(&self) -> Option<RealmId> { self.realm }
    pub fn parent(&self) -> Option<ClockId> { self.parent }

    // ── Remaining time ────────────────────────────────────────────────────

    /// Seconds from `current` to `end` (never negative).
    #[inline]
    pub fn remaining_seconds(&self) -> i64 {
        (self.end - self.current).max(0)
    }

    #[inline]
    pub fn remaining_minutes(&self) -> i64 {
        self.remaining_seconds() / SECS_PER_MINUTE
    }

    #[inline]
    pub fn remaining_hours(&self) -> i64 {
        self.remaining_seconds() / SECS_PER_HOUR
    }

    #[inline]
    pub fn remaining_days(&self) -> i64 {
        self.remaining_seconds() / SECS_PER_DAY
    }
}

// ── ClockTree ─────────────────────────────────────────────────────────────────

/// Arena owning every clock of one simulation context.
#[derive(Clone, Debug, Default)]
pub struct ClockTree {
    clocks: Vec<Clock>,
}

impl ClockTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    pub fn get(&self, id: ClockId) -> CoreResult<&Clock> {
        self.clocks.get(id.index()).ok_or(CoreError::ClockNotFound(id))
    }

    fn get_mut(&mut self, id: ClockId) -> CoreResult<&mut Clock> {
        self.clocks.get_mut(id.index()).ok_or(CoreError::ClockNotFound(id))
    }

    fn push(&mut self, clock: Clock) -> ClockId {
        let id = ClockId(self.clocks.len() as u32);
        self.clocks.push(clock);
        id
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a root clock positioned on `epoch` (copies its start, progress,
    /// and end).
    pub fn add_root(&mut self, epoch: TimeBox) -> ClockId {
        let mut clock = Clock::from_window(epoch.start, epoch.progress, epoch.end, None);
        clock.epoch = Some(epoch);
        self.push(clock)
    }

    /// Add a child of `parent` that starts with the parent's window.
    pub fn add_child(&mut self, parent: ClockId) -> CoreResult<ClockId> {
        let p = self.get(parent)?;
        let mut clock = Clock::from_window(p.start, p.current, p.end, Some(parent));
        clock.epoch = p.epoch.clone();
        Ok(self.push(clock))
    }

    /// Return the cached realm clock under `parent`, creating it on first
    /// request.  Every retrieval restores the realm scope and re-taps, so the
    /// parent always ends up reflecting the realm that was asked for last.
    pub fn realm_clock(&mut self, parent: ClockId, realm: RealmId) -> CoreResult<ClockId> {
        let cached = self.get(parent)?.realm_clocks.get(&realm).copied();
        let child = match cached {
            Some(child) => child,
            None => {
                let child = self.add_child(parent)?;
                self.get_mut(parent)?.realm_clocks.insert(realm, child);
                child
            }
        };
        self.get_mut(child)?.realm = Some(realm);
        self.tap(child)?;
        Ok(child)
    }

    // ── Context ───────────────────────────────────────────────────────────

    /// Attach `event` and tap.  A clock already positioned in an increment
    /// keeps its cursor there; any other clock moves onto the event window.
    pub fn set_event(&mut self, id: ClockId, event: TimeBox) -> CoreResult<()> {
        if self.get(id)?.increment.is_none() {
            self.reposition(id, &event)?;
        }
        self.get_mut(id)?.event = Some(event);
        self.tap(id)
    }

    /// Position the clock on `increment` and tap.
    pub fn set_increment(&mut self, id: ClockId, increment: TimeBox) -> CoreResult<()> {
        self.reposition(id, &increment)?;
        self.get_mut(id)?.increment = Some(increment);
        self.tap(id)
    }

    /// Move the local cursor onto `window`.  The cursor never precedes the
    /// parent's window start.
    fn reposition(&mut self, id: ClockId, window: &TimeBox) -> CoreResult<()> {
        let floor = match self.get(id)?.parent {
            Some(p) => self.get(p)?.start,
            None    => i64::MIN,
        };
        let clock = self.get_mut(id)?;
        clock.start   = window.start;
        clock.end     = window.end;
        clock.current = window.progress.max(floor).clamp(window.start.min(window.end), window.end);
        Ok(())
    }

    /// Copy this clock's event, increment, and realm (whichever are set) into
    /// every ancestor.
    pub fn tap(&mut self, id: ClockId) -> CoreResult<()> {
        let clock = self.get(id)?;
        let event     = clock.event.clone();
        let increment = clock.increment.clone();
        let realm     = clock.realm;
        let mut next  = clock.parent;

        while let Some(pid) = next {
            let p = self.get_mut(pid)?;
            if let Some(e) = &event {
                p.event = Some(e.clone());
            }
            if let Some(i) = &increment {
                p.increment = Some(i.clone());
            }
            if realm.is_some() {
                p.realm = realm;
            }
            next = p.parent;
        }
        Ok(())
    }

    /// Clear this clock's event, increment, and realm.  Ancestors keep
    /// whatever the last tap gave them.
    pub fn untap(&mut self, id: ClockId) -> CoreResult<()> {
        let clock = self.get_mut(id)?;
        clock.event     = None;
        clock.increment = None;
        clock.realm     = None;
        Ok(())
    }

    /// The increment this clock is positioned in.
    ///
    /// # Errors
    /// [`CoreError::ClockNotAdvanced`] when no increment has been set yet,
    /// distinct from an increment that exists but is spent.
    pub fn active_increment(&self, id: ClockId) -> CoreResult<&TimeBox> {
        let clock = self.get(id)?;
        clock
            .increment
            .as_ref()
            .ok_or(CoreError::ClockNotAdvanced { realm: clock.realm })
    }

    /// Advance the cursor and the active increment's progress by `secs`,
    /// both clamped at their window ends, then tap.  Returns the new cursor.
    pub fn advance(&mut self, id: ClockId, secs: i64) -> CoreResult<i64> {
        let clock = self.get_mut(id)?;
        clock.current = (clock.current + secs.max(0)).min(clock.end);
        if let Some(inc) = clock.increment.as_mut() {
            inc.advance(secs);
        }
        let current = clock.current;
        self.tap(id)?;
        Ok(current)
    }
}
