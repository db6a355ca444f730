//! What opens after an increment ends.

use wsim_core::time::SECS_PER_HOUR;
use wsim_core::{CoreResult, RealmId, TimeBox, TimeBoxId, TimeBoxKind};

/// Produces the increment that follows `ended` in `realm`.
pub trait IncrementRule: Send + Sync {
    fn next_increment(&self, realm: RealmId, ended: &TimeBox, id: TimeBoxId) -> CoreResult<TimeBox>;
}

/// Back-to-back one-hour increments.
#[derive(Copy, Clone, Debug, Default)]
pub struct HourlyIncrements;

impl IncrementRule for HourlyIncrements {
    fn next_increment(&self, _realm: RealmId, ended: &TimeBox, id: TimeBoxId) -> CoreResult<TimeBox> {
        Ok(TimeBox::hour(id, ended.end + 1))
    }
}

/// Back-to-back increments of a fixed length.
#[derive(Copy, Clone, Debug)]
pub struct FixedIncrements {
    pub secs: i64,
}

impl FixedIncrements {
    pub fn new(secs: i64) -> Self {
        Self { secs }
    }
}

impl Default for FixedIncrements {
    fn default() -> Self {
        Self { secs: SECS_PER_HOUR }
    }
}

impl IncrementRule for FixedIncrements {
    fn next_increment(&self, _realm: RealmId, ended: &TimeBox, id: TimeBoxId) -> CoreResult<TimeBox> {
        let start = ended.end + 1;
        TimeBox::new(id, TimeBoxKind::Increment, format!("increment {}", id.0), start, start + self.secs - 1)
    }
}
