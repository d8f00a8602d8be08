//! Line topology engine.
//!
//! Keeps the sections of one line as an unordered set and derives the
//! single ordered chain of stations from it on demand. Insertions may
//! extend either end of the line or split an existing section; removals
//! are limited to the tail station.
//!
//! The engine does no I/O and knows nothing about storage. Station ids are
//! assumed to have been checked against the registry by the caller.

mod error;
mod sections;

pub use error::{MalformedTopology, TopologyError};
pub use sections::{Sections, derive_ordered_stations, insert_section, remove_section};
