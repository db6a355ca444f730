//! Time boxes: epochs, events, and increments.
//!
//! # Design
//!
//! Simulated time is an `i64` count of seconds since the world's zero
//! instant.  Using integer seconds keeps every window computation exact (no
//! floating-point drift) and needs no datetime library.
//!
//! A [`TimeBox`] is a closed window `[start, end]` with a `progress` cursor.
//! Three kinds nest inside each other:
//!
//! | Kind        | Nominal span     |
//! |-------------|------------------|
//! | `Epoch`     | one year         |
//! | `Event`     | part of an epoch |
//! | `Increment` | one hour         |
//!
//! The scheduler advances the active increment's `progress`; when the
//! increment is spent, an increment rule opens the next one.

use std::fmt;

use crate::{CoreError, CoreResult, TimeBoxId};

pub const SECS_PER_MINUTE: i64 = 60;
pub const SECS_PER_HOUR:   i64 = 3_600;
pub const SECS_PER_DAY:    i64 = 86_400;
pub const SECS_PER_YEAR:   i64 = 365 * SECS_PER_DAY;

// ── TimeBoxKind ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeBoxKind {
    Epoch,
    Event,
    Increment,
}

impl TimeBoxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeBoxKind::Epoch     => "epoch",
            TimeBoxKind::Event     => "event",
            TimeBoxKind::Increment => "increment",
        }
    }
}

impl fmt::Display for TimeBoxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TimeBox ───────────────────────────────────────────────────────────────────

/// A time-boxed record with a progress cursor.
///
/// Invariant: `start <= progress <= end`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBox {
    pub id:       TimeBoxId,
    pub kind:     TimeBoxKind,
    pub name:     String,
    pub start:    i64,
    pub progress: i64,
    pub end:      i64,
}

impl TimeBox {
    /// Create a box spanning `[start, end]` with progress at `start`.
    pub fn new(
        id:    TimeBoxId,
        kind:  TimeBoxKind,
        name:  impl Into<String>,
        start: i64,
        end:   i64,
    ) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::InvalidWindow { start, end });
        }
        Ok(Self { id, kind, name: name.into(), start, progress: start, end })
    }

    /// A one-year epoch beginning at `start`.
    pub fn epoch(id: TimeBoxId, name: impl Into<String>, start: i64) -> Self {
        Self {
            id,
            kind:     TimeBoxKind::Epoch,
            name:     name.into(),
            start,
            progress: start,
            end:      start + SECS_PER_YEAR - 1,
        }
    }

    /// A one-hour increment beginning at `start` (`end` is the hour's last second).
    pub fn hour(id: TimeBoxId, start: i64) -> Self {
        Self {
            id,
            kind:     TimeBoxKind::Increment,
            name:     format!("hour {}", start.div_euclid(SECS_PER_HOUR)),
            start,
            progress: start,
            end:      start + SECS_PER_HOUR - 1,
        }
    }

    /// Window length in seconds.
    #[inline]
    pub fn span_secs(&self) -> i64 {
        self.end - self.start
    }

    /// Seconds from `progress` to `end`.
    #[inline]
    pub fn remaining_secs(&self) -> i64 {
        (self.end - self.progress).max(0)
    }

    /// `true` once `progress` has reached `end`.
    #[inline]
    pub fn is_spent(&self) -> bool {
        self.progress >= self.end
    }

    #[inline]
    pub fn contains(&self, t: i64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Move `progress` forward by `secs`, stopping at `end`.  Returns the new
    /// progress.
    pub fn advance(&mut self, secs: i64) -> i64 {
        self.progress = (self.progress + secs.max(0)).min(self.end);
        self.progress
    }
}

impl fmt::Display for TimeBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} [{}..{}] @{}", self.kind, self.name, self.start, self.end, self.progress)
    }
}

/// Break a second count into (day, hour, minute) components.
/// Useful for human-readable logging without a datetime library.
pub fn split_dhm(secs: i64) -> (i64, i64, i64) {
    let secs = secs.max(0);
    let days    = secs / SECS_PER_DAY;
    let hours   = (secs % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    (days, hours, minutes)
}
