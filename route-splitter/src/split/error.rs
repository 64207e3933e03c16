//! Per-trip matching errors and comparator contract errors.

use serde::Serialize;

use crate::domain::{OccurrenceIndex, RouteId, TripId};

/// A trip could not be assigned to a direction or split.
///
/// Scoped to one trip: the route processor reports it and carries on with
/// the remaining trips.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TripError {
    /// The trip serves neither direction's positions in order
    #[error("trip {trip_id} matches neither direction of route {route_id}")]
    UnmatchedTrip { route_id: RouteId, trip_id: TripId },

    /// Both directions match equally, no split is possible and the feed
    /// declares no direction to break the tie
    #[error("trip {trip_id} matches both directions of route {route_id} equally")]
    AmbiguousTrip { route_id: RouteId, trip_id: TripId },

    /// A split boundary that doesn't fall inside the trip
    #[error("split boundary {boundary} is outside trip {trip_id} ({len} stop times)")]
    BoundaryOutOfRange {
        trip_id: TripId,
        boundary: OccurrenceIndex,
        len: usize,
    },
}

impl TripError {
    /// Returns the trip this error is scoped to.
    pub fn trip_id(&self) -> &TripId {
        match self {
            TripError::UnmatchedTrip { trip_id, .. }
            | TripError::AmbiguousTrip { trip_id, .. }
            | TripError::BoundaryOutOfRange { trip_id, .. } => trip_id,
        }
    }
}

/// The comparator was asked to order stops that don't share a trip and
/// direction. A caller bug, never a data problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("incomparable stops: {reason}")]
pub struct IncomparableStops {
    reason: &'static str,
}

impl IncomparableStops {
    pub(crate) fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}
