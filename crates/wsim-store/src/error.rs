//! Error types for wsim-store.

use thiserror::Error;

/// Errors raised by record stores and the write queue.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV journal error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("no {kind} record with id {id}")]
    UnknownRecord { kind: String, id: u64 },

    #[error("{kind} record {id} already exists")]
    Duplicate { kind: String, id: u64 },

    #[error("journal line {line}: {reason}")]
    Journal { line: u64, reason: String },
}

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;
