//! Station type.

use super::error::non_blank;
use super::{DomainError, StationId};

/// A station in the registry.
///
/// Stations are immutable once created. Lines reference them by id and
/// never own them.
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Station, StationId};
///
/// let station = Station::new(StationId(1), " Seoul ").unwrap();
/// assert_eq!(station.name(), "Seoul");
///
/// // Blank names are rejected
/// assert!(Station::new(StationId(2), "   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    id: StationId,
    name: String,
}

impl Station {
    /// Create a station, trimming the name.
    pub fn new(id: StationId, name: &str) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: non_blank("station name", name)?,
        })
    }

    /// Returns the station id.
    pub fn id(&self) -> StationId {
        self.id
    }

    /// Returns the station name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
