use thiserror::Error;

use wsim_core::{ActionResultId, AgentId};
use wsim_spatial::SpatialError;

/// Errors an [`ActionProvider`](crate::ActionProvider) reports back to the
/// scheduler.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("agent {0} does not exist")]
    UnknownAgent(AgentId),

    #[error("agent {0} has no location")]
    NoLocation(AgentId),

    #[error("action {0} has no usable target")]
    MissingTarget(ActionResultId),

    #[error("action {action} is missing parameter `{name}`")]
    MissingParameter { action: ActionResultId, name: &'static str },

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
