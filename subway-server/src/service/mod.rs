//! Line service.
//!
//! Orchestrates the station registry, the line repository and the
//! topology engine. Callers hand in primitive, already-parsed values and
//! get back resolved views or a [`ServiceError`].

mod error;
mod lines;

pub use error::ServiceError;
pub use lines::{LineService, LineUpdate, LineView, NewLine, NewSection};
