//! Section set of a single line and the operations that keep it a path.
//!
//! Sections are stored unordered. The station order is derived each time it
//! is needed by building an upstream → downstream adjacency map and walking
//! it from the only station that has no incoming section.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::domain::{Section, StationId};

use super::error::{MalformedTopology, TopologyError};

/// The sections of one line.
///
/// # Invariants
///
/// - There is at least one section.
/// - The sections compose into exactly one simple path: every station has
///   at most one upstream and one downstream neighbour, there is no cycle,
///   and every section is reachable from the first station.
///
/// Mutations either succeed completely or leave the set untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    sections: Vec<Section>,
}

impl Sections {
    /// Start a line from its initial section.
    pub fn new(first: Section) -> Self {
        Self {
            sections: vec![first],
        }
    }

    /// Validate a raw section list loaded from elsewhere.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, MalformedTopology> {
        walk(&sections)?;
        Ok(Self { sections })
    }

    /// Number of sections on the line.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Iterate sections in storage order (not path order).
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// The sections as a slice, in storage order.
    pub fn as_slice(&self) -> &[Section] {
        &self.sections
    }

    /// Whether `station` is an endpoint of any section.
    pub fn contains(&self, station: StationId) -> bool {
        self.sections.iter().any(|section| section.touches(station))
    }

    /// The upstream-most station.
    pub fn head(&self) -> StationId {
        let downstreams: HashSet<StationId> =
            self.sections.iter().map(Section::downstream).collect();
        self.sections
            .iter()
            .map(Section::upstream)
            .find(|station| !downstreams.contains(station))
            .expect("a simple path has exactly one first station")
    }

    /// The downstream-most station.
    pub fn tail(&self) -> StationId {
        let upstreams: HashSet<StationId> = self.sections.iter().map(Section::upstream).collect();
        self.sections
            .iter()
            .map(Section::downstream)
            .find(|station| !upstreams.contains(station))
            .expect("a simple path has exactly one last station")
    }

    /// Sum of all section distances.
    pub fn total_distance(&self) -> u64 {
        self.sections
            .iter()
            .map(|section| u64::from(section.distance().get()))
            .sum()
    }

    /// Station ids from head to tail.
    pub fn ordered_stations(&self) -> Vec<StationId> {
        let next: HashMap<StationId, StationId> = self
            .sections
            .iter()
            .map(|section| (section.upstream(), section.downstream()))
            .collect();

        let mut station = self.head();
        let mut ordered = Vec::with_capacity(self.sections.len() + 1);
        ordered.push(station);
        while let Some(&following) = next.get(&station) {
            ordered.push(following);
            station = following;
        }
        ordered
    }

    /// Add a section to the line.
    ///
    /// The section is appended at the tail, prepended at the head, or used
    /// to split the existing section that shares its known endpoint. In the
    /// split case the new section keeps its own distance and the remainder
    /// goes to the other half, so the split must be strictly shorter than
    /// the section it divides.
    pub fn insert(&mut self, section: Section) -> Result<(), TopologyError> {
        let upstream = section.upstream();
        let downstream = section.downstream();

        match (self.contains(upstream), self.contains(downstream)) {
            (false, false) => Err(TopologyError::NoSharedEndpoint {
                upstream,
                downstream,
            }),
            (true, true) => Err(TopologyError::DuplicateSection {
                upstream,
                downstream,
            }),
            _ if upstream == self.tail() || downstream == self.head() => {
                trace!(%upstream, %downstream, "extending line at an end");
                self.sections.push(section);
                Ok(())
            }
            _ => self.split(section),
        }
    }

    /// Split the existing section that starts at `section.upstream()` or
    /// ends at `section.downstream()`.
    fn split(&mut self, section: Section) -> Result<(), TopologyError> {
        let position = self
            .sections
            .iter()
            .position(|existing| {
                existing.upstream() == section.upstream()
                    || existing.downstream() == section.downstream()
            })
            .ok_or(TopologyError::NonContiguous {
                upstream: section.upstream(),
                downstream: section.downstream(),
            })?;

        let existing = self.sections[position];
        let remainder = existing
            .distance()
            .checked_sub(section.distance())
            .ok_or(TopologyError::SectionTooLong {
                requested: section.distance(),
                existing: existing.distance(),
            })?;

        let (first, second) = if existing.upstream() == section.upstream() {
            let rest = Section::between(section.downstream(), existing.downstream(), remainder);
            (section, rest)
        } else {
            let rest = Section::between(existing.upstream(), section.upstream(), remainder);
            (rest, section)
        };

        trace!(
            upstream = %existing.upstream(),
            downstream = %existing.downstream(),
            "splitting section"
        );
        self.sections[position] = first;
        self.sections.insert(position + 1, second);
        Ok(())
    }

    /// Remove the tail station together with the section leading to it.
    pub fn remove(&mut self, station: StationId) -> Result<(), TopologyError> {
        if self.sections.len() == 1 {
            return Err(TopologyError::MinimumSectionViolation);
        }

        let tail = self.tail();
        if station != tail {
            return Err(TopologyError::InvalidRemovalTarget { station, tail });
        }

        self.sections.retain(|section| section.downstream() != tail);
        Ok(())
    }
}

/// Derive the station order of a raw section list.
///
/// Unlike [`Sections::ordered_stations`], this accepts any list and reports
/// why it does not form a single path.
pub fn derive_ordered_stations(sections: &[Section]) -> Result<Vec<StationId>, MalformedTopology> {
    walk(sections)
}

/// Insert into a snapshot, returning the updated set.
pub fn insert_section(sections: &Sections, section: Section) -> Result<Sections, TopologyError> {
    let mut updated = sections.clone();
    updated.insert(section)?;
    Ok(updated)
}

/// Remove the tail station from a snapshot, returning the updated set.
pub fn remove_section(sections: &Sections, station: StationId) -> Result<Sections, TopologyError> {
    let mut updated = sections.clone();
    updated.remove(station)?;
    Ok(updated)
}

/// Walk a raw section list from its first station, checking the path shape.
fn walk(sections: &[Section]) -> Result<Vec<StationId>, MalformedTopology> {
    if sections.is_empty() {
        return Err(MalformedTopology::Empty);
    }

    let mut next: HashMap<StationId, StationId> = HashMap::with_capacity(sections.len());
    let mut arriving: HashSet<StationId> = HashSet::with_capacity(sections.len());
    for section in sections {
        if next
            .insert(section.upstream(), section.downstream())
            .is_some()
        {
            return Err(MalformedTopology::BranchesDownstream(section.upstream()));
        }
        if !arriving.insert(section.downstream()) {
            return Err(MalformedTopology::BranchesUpstream(section.downstream()));
        }
    }

    // With at most one incoming edge per station, a walk from a station with
    // none cannot revisit anything.
    let mut station = sections
        .iter()
        .map(Section::upstream)
        .find(|station| !arriving.contains(station))
        .ok_or(MalformedTopology::Cycle)?;

    let mut ordered = Vec::with_capacity(sections.len() + 1);
    ordered.push(station);
    while let Some(&following) = next.get(&station) {
        ordered.push(following);
        station = following;
    }

    let expected = sections.len() + 1;
    if ordered.len() != expected {
        return Err(MalformedTopology::Disconnected {
            reached: ordered.len(),
            expected,
        });
    }

    Ok(ordered)
}
