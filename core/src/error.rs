//! Error types for the booking domain.

use crate::booking::ValidationErrors;
use crate::types::{ExperienceId, SlotId};
use thiserror::Error;

/// Errors raised by a [`BookingStore`](crate::store::BookingStore) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored row could not be turned into a domain value.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

/// Errors that can occur while creating or looking up a booking.
///
/// Every variant except [`BookingError::Store`] is a client error and carries a
/// message that is safe to show to the customer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// One or more request fields failed validation.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The experience does not exist.
    #[error("Experience not found")]
    ExperienceNotFound(ExperienceId),

    /// The slot does not exist or belongs to another experience.
    #[error("Slot not found")]
    SlotNotFound(SlotId),

    /// No booking with this reference.
    #[error("Booking not found")]
    BookingNotFound(String),

    /// More guests requested than spots remain.
    #[error("Only {available} spots available")]
    InsufficientCapacity {
        /// Spots remaining on the slot
        available: u32,
        /// Guests requested
        requested: u32,
    },

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    /// Short reason label used for metrics.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::ExperienceNotFound(_) => "experience_not_found",
            Self::SlotNotFound(_) => "slot_not_found",
            Self::BookingNotFound(_) => "booking_not_found",
            Self::InsufficientCapacity { .. } => "insufficient_capacity",
            Self::Store(_) => "store",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = BookingError::InsufficientCapacity {
            available: 3,
            requested: 5,
        };
        assert_eq!(err.to_string(), "Only 3 spots available");
        assert_eq!(err.reason(), "insufficient_capacity");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = BookingError::from(StoreError::DatabaseError("connection reset".into()));
        assert_eq!(err.to_string(), "Database error: connection reset");
    }
}
