use thiserror::Error;

use wsim_core::AgentId;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("roster parse error: {0}")]
    Parse(String),

    #[error("unknown statistic {0:?}")]
    UnknownStat(String),

    #[error("agent id {0} assigned twice")]
    DuplicateId(AgentId),

    #[error("agent id {id} out of range for a roster of {count}")]
    IdOutOfRange { id: AgentId, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AgentResult<T> = Result<T, AgentError>;
