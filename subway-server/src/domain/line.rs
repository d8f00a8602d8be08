//! Line type.

use crate::topology::{Sections, TopologyError};

use super::error::non_blank;
use super::{DomainError, LineId, Section, StationId};

/// A named metro line and its sections.
///
/// The station order is never stored; it is derived from the sections
/// whenever [`Line::stations`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    id: LineId,
    name: String,
    color: String,
    sections: Sections,
}

impl Line {
    /// Create a line from its first section.
    ///
    /// Name and color are trimmed and must not be blank. Name uniqueness
    /// across lines is the repository's concern.
    pub fn new(id: LineId, name: &str, color: &str, first: Section) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: non_blank("line name", name)?,
            color: non_blank("line color", color)?,
            sections: Sections::new(first),
        })
    }

    /// Returns the line id.
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Returns the line name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the line color.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the line's sections.
    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Station ids from head to tail.
    pub fn stations(&self) -> Vec<StationId> {
        self.sections.ordered_stations()
    }

    /// Rename the line.
    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        self.name = non_blank("line name", name)?;
        Ok(())
    }

    /// Change the line color.
    pub fn recolor(&mut self, color: &str) -> Result<(), DomainError> {
        self.color = non_blank("line color", color)?;
        Ok(())
    }

    /// Register a new section on the line.
    pub fn add_section(&mut self, section: Section) -> Result<(), TopologyError> {
        self.sections.insert(section)
    }

    /// Remove the tail station from the line.
    pub fn remove_station(&mut self, station: StationId) -> Result<(), TopologyError> {
        self.sections.remove(station)
    }
}
