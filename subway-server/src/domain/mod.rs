//! Domain types for the metro line service.
//!
//! This module contains the core domain model types: stations, sections
//! and lines. All types enforce their invariants at construction time, so
//! code that receives these types can trust their validity.

mod distance;
mod error;
mod ids;
mod line;
mod section;
mod station;

pub use distance::Distance;
pub use error::DomainError;
pub use ids::{LineId, StationId};
pub use line::Line;
pub use section::Section;
pub use station::Station;
