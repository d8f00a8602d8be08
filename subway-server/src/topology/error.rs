//! Topology error types.

use crate::domain::{Distance, StationId};

/// Reasons a section mutation is rejected.
///
/// Every rejected precondition maps to exactly one variant so callers can
/// tell them apart. None of them leave the section set modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Neither end of the new section is on the line
    #[error("section {upstream}->{downstream} shares no station with the line")]
    NoSharedEndpoint {
        upstream: StationId,
        downstream: StationId,
    },

    /// Both ends of the new section are already on the line
    #[error("stations {upstream} and {downstream} are both already on the line")]
    DuplicateSection {
        upstream: StationId,
        downstream: StationId,
    },

    /// A split would leave a section of zero or negative length
    #[error("new section distance {requested} must be shorter than existing section distance {existing}")]
    SectionTooLong {
        requested: Distance,
        existing: Distance,
    },

    /// The new section fits neither end nor any existing section
    #[error("section {upstream}->{downstream} is not contiguous with the line")]
    NonContiguous {
        upstream: StationId,
        downstream: StationId,
    },

    /// Only the tail station may be removed
    #[error("station {station} is not the last station of the line ({tail})")]
    InvalidRemovalTarget { station: StationId, tail: StationId },

    /// The line only has one section left
    #[error("a line must keep at least one section")]
    MinimumSectionViolation,
}

/// A raw section list that does not form exactly one simple path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedTopology {
    /// No sections at all
    #[error("a line needs at least one section")]
    Empty,

    /// Two sections leave the same station
    #[error("station {0} has more than one downstream section")]
    BranchesDownstream(StationId),

    /// Two sections arrive at the same station
    #[error("station {0} has more than one upstream section")]
    BranchesUpstream(StationId),

    /// Every station has an incoming section
    #[error("sections form a cycle with no first station")]
    Cycle,

    /// Walking from the first station does not reach every section
    #[error("sections are not connected: reached {reached} of {expected} stations")]
    Disconnected { reached: usize, expected: usize },
}
