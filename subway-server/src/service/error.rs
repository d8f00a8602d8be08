//! Service error types.

use crate::domain::{DomainError, LineId, StationId};
use crate::repository::NameTaken;
use crate::topology::TopologyError;

/// Errors from line service operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Station addressed directly (e.g. in a path) does not exist
    #[error("station {0} not found")]
    StationNotFound(StationId),

    /// Station referenced by a new line or section does not exist
    #[error("station {0} does not exist")]
    UnknownStation(StationId),

    /// Line does not exist
    #[error("line {0} not found")]
    LineNotFound(LineId),

    /// Another line already has this name
    #[error("line name {0:?} is already in use")]
    DuplicateLineName(String),

    /// Station is still part of a line
    #[error("station {station} is still used by line {line}")]
    StationInUse { station: StationId, line: LineId },

    /// Invalid value in the request
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Section mutation rejected by the topology engine
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

impl From<NameTaken> for ServiceError {
    fn from(e: NameTaken) -> Self {
        ServiceError::DuplicateLineName(e.0)
    }
}
