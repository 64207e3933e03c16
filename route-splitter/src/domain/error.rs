//! Domain error types.
//!
//! These errors represent validation failures of feed records handed over by
//! ingestion. They are distinct from configuration and matching errors.

use super::{InvalidDirection, InvalidId, TripId};

/// Domain-level errors for feed record validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A trip was published without any stop times
    #[error("trip {0} has no stop times")]
    EmptyTrip(TripId),

    /// A stop or trip identifier failed validation
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    /// A direction index other than 0 or 1
    #[error(transparent)]
    InvalidDirection(#[from] InvalidDirection),
}
