//! Domain error types.
//!
//! These errors represent values that fail validation at construction
//! time. They are distinct from topology errors, which describe a valid
//! section that cannot be placed on a particular line.

use super::StationId;

/// Domain-level errors for value validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Distance is zero, negative, or too large
    #[error("distance must be a positive integer, got {0}")]
    InvalidDistance(i64),

    /// A section must connect two different stations
    #[error("section must connect two different stations (both ends are station {0})")]
    SameEndpoints(StationId),

    /// A required text field is empty or whitespace
    #[error("{0} must not be blank")]
    BlankField(&'static str),
}

/// Trim a text field and reject it if nothing is left.
pub(crate) fn non_blank(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::BlankField(field));
    }
    Ok(trimmed.to_string())
}
