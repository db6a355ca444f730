//! Spatial-subsystem error type.

use thiserror::Error;

use wsim_core::LocationId;

/// Errors produced by `wsim-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: LocationId, to: LocationId },

    #[error("cell {0} not found in geography")]
    CellNotFound(LocationId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
