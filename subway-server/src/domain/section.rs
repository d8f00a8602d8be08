//! Section type.
//!
//! A `Section` is a directed edge between two adjacent stations on a line,
//! carrying the distance between them.

use super::{Distance, DomainError, StationId};

/// A directed edge from an upstream station to a downstream station.
///
/// # Invariants
///
/// - `upstream != downstream`
/// - `distance > 0` (guaranteed by [`Distance`])
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Distance, Section, StationId};
///
/// let ten = Distance::new(10).unwrap();
/// let section = Section::new(StationId(1), StationId(2), ten).unwrap();
/// assert_eq!(section.upstream(), StationId(1));
/// assert_eq!(section.downstream(), StationId(2));
///
/// // A section cannot loop back onto its own station
/// assert!(Section::new(StationId(1), StationId(1), ten).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Section {
    upstream: StationId,
    downstream: StationId,
    distance: Distance,
}

impl Section {
    /// Construct a section, validating that the endpoints differ.
    pub fn new(
        upstream: StationId,
        downstream: StationId,
        distance: Distance,
    ) -> Result<Self, DomainError> {
        if upstream == downstream {
            return Err(DomainError::SameEndpoints(upstream));
        }
        Ok(Self::between(upstream, downstream, distance))
    }

    /// Construct a section whose endpoints are already known to differ.
    pub(crate) fn between(upstream: StationId, downstream: StationId, distance: Distance) -> Self {
        debug_assert_ne!(upstream, downstream);
        Self {
            upstream,
            downstream,
            distance,
        }
    }

    /// Returns the upstream station.
    pub fn upstream(&self) -> StationId {
        self.upstream
    }

    /// Returns the downstream station.
    pub fn downstream(&self) -> StationId {
        self.downstream
    }

    /// Returns the section distance.
    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Whether either end of the section is `station`.
    pub fn touches(&self, station: StationId) -> bool {
        self.upstream == station || self.downstream == station
    }
}
