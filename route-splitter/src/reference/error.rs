//! Reference configuration error types.

use super::InvalidAnnotation;
use crate::domain::{Direction, InvalidId, RouteId, StopId};

/// A reference sequence violates one of its authoring invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// Two anchors claim the same stop without an equivalent/shared marker
    #[error("stop {0} is anchored more than once")]
    AmbiguousAnchorConflict(StopId),

    /// A shared stop listed twice in the same direction
    #[error("shared stop {0} appears more than once")]
    DuplicateSharedStop(StopId),

    /// No anchor or equivalent entry, so nothing could ever match
    #[error("sequence has no anchor or equivalent stops")]
    NoMatchingPositions,
}

/// Errors raised while loading reference configuration.
///
/// Per-route variants reject only the offending route; `Io` and `Json`
/// reject the whole file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A direction's sequence failed validation
    #[error("route {route_id} direction {direction}: {source}")]
    Sequence {
        route_id: RouteId,
        direction: Direction,
        #[source]
        source: SequenceError,
    },

    /// A stop entry has an empty or malformed stop ID
    #[error("route {route_id} direction {direction}: {source}")]
    InvalidStopId {
        route_id: RouteId,
        direction: Direction,
        #[source]
        source: InvalidId,
    },

    /// A stop entry carries an unknown annotation marker
    #[error("route {route_id} direction {direction}: {source}")]
    InvalidAnnotation {
        route_id: RouteId,
        direction: Direction,
        #[source]
        source: InvalidAnnotation,
    },

    /// A route must author exactly two directions
    #[error("route {route_id} must have exactly 2 directions, found {found}")]
    WrongDirectionCount { route_id: RouteId, found: usize },

    /// The same route was configured twice
    #[error("route {0} is configured more than once")]
    DuplicateRoute(RouteId),

    /// Reading the configuration file failed
    #[error("failed to read reference configuration: {message}")]
    Io { message: String },

    /// The configuration file is not valid JSON for the expected schema
    #[error("invalid reference configuration: {message}")]
    Json { message: String },
}

impl ConfigError {
    /// Returns the route this error is scoped to, if any.
    pub fn route_id(&self) -> Option<RouteId> {
        match self {
            ConfigError::Sequence { route_id, .. }
            | ConfigError::InvalidStopId { route_id, .. }
            | ConfigError::InvalidAnnotation { route_id, .. }
            | ConfigError::WrongDirectionCount { route_id, .. } => Some(*route_id),
            ConfigError::DuplicateRoute(route_id) => Some(*route_id),
            ConfigError::Io { .. } | ConfigError::Json { .. } => None,
        }
    }
}

/// No reference sequence was authored for the route.
///
/// Recoverable: the caller passes the route's trips through unsplit, in feed
/// order, with their feed-declared direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no reference sequence configured for route {route_id}")]
pub struct NotConfigured {
    pub route_id: RouteId,
}
