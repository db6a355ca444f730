use thiserror::Error;
use wsim_core::{CoreError, RealmId};
use wsim_store::StoreError;

#[derive(Debug, Error)]
pub enum OverwatchError {
    /// `process()` ran `passes` passes and watched actions remain.
    #[error("iteration ceiling of {passes} passes reached with {remaining} action(s) still watched")]
    IterationCeiling { passes: u32, remaining: usize },

    #[error(transparent)]
    Clock(#[from] CoreError),

    #[error("increment in {realm} has {remaining_secs}s left, more than the {max_secs}s allowed")]
    IncrementTooLong { realm: RealmId, remaining_secs: i64, max_secs: i64 },

    #[error("no action with id {0}")]
    UnknownAction(wsim_core::ActionResultId),

    #[error("persistence error: {0}")]
    Store(#[from] StoreError),

    #[error("overwatch configuration error: {0}")]
    Config(String),

    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("overwatch builder error: {0}")]
    Builder(String),
}

pub type OverwatchResult<T> = Result<T, OverwatchError>;
