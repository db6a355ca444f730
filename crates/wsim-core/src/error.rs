//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where clock or parse failures can reach them.

use thiserror::Error;

use crate::{ClockId, RealmId};

#[derive(Debug, Error)]
pub enum CoreError {
    /// A clock was asked for its active increment before one was set.
    /// Distinct from an increment that exists but has no time left.
    #[error("clock has not been advanced into an increment (realm {realm:?})")]
    ClockNotAdvanced { realm: Option<RealmId> },

    #[error("clock {0} not found")]
    ClockNotFound(ClockId),

    #[error("invalid time window: end {end} precedes start {start}")]
    InvalidWindow { start: i64, end: i64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
