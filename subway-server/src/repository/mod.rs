//! In-memory storage for stations and lines.
//!
//! Both stores are cheap to clone and share their contents. Lines are
//! held behind one mutex each, so mutations of the same line are
//! serialized while different lines proceed independently. The station
//! registry lock is taken before the line table, and the table before a
//! line.

mod lines;
mod stations;

pub use lines::{LineHandle, LineRepository, NameTaken};
pub use stations::{StationRegistry, StationsRead, StationsWrite};
