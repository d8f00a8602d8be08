//! Section distance type.

use std::fmt;

use super::DomainError;

/// Distance covered by a section.
///
/// Always strictly positive. The unit is whatever the operator uses
/// consistently across a line; the engine only adds and subtracts.
///
/// # Examples
///
/// ```
/// use subway_server::domain::Distance;
///
/// let ten = Distance::new(10).unwrap();
/// assert_eq!(ten.get(), 10);
///
/// // Zero and negative distances are rejected
/// assert!(Distance::new(0).is_err());
/// assert!(Distance::new(-3).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(u32);

impl Distance {
    /// Create a distance from a raw integer.
    ///
    /// Returns an error if the value is not in `1..=u32::MAX`.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::InvalidDistance(value));
        }
        u32::try_from(value)
            .map(Distance)
            .map_err(|_| DomainError::InvalidDistance(value))
    }

    /// Returns the raw distance.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Subtract `part` from this distance, keeping the result positive.
    ///
    /// Returns `None` when `part >= self`, since a section cannot have a
    /// zero or negative length.
    pub fn checked_sub(self, part: Distance) -> Option<Distance> {
        self.0
            .checked_sub(part.0)
            .filter(|remainder| *remainder > 0)
            .map(Distance)
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", self.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
