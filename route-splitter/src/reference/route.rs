//! Per-route reference: both directions and their headsigns.

use super::error::ConfigError;
use super::{ReferenceSequence, StopRef};
use crate::domain::{Direction, RouteId};

/// Authored description of one direction, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionSpec {
    /// Rider-facing label of every trip assigned to this direction.
    pub headsign: String,
    /// Canonical stop order with annotations.
    pub stops: Vec<StopRef>,
}

impl DirectionSpec {
    /// Create a direction spec.
    pub fn new(headsign: impl Into<String>, stops: Vec<StopRef>) -> Self {
        Self {
            headsign: headsign.into(),
            stops,
        }
    }
}

/// Both validated reference sequences of a route, with their headsigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteReference {
    route_id: RouteId,
    sequences: [ReferenceSequence; 2],
    headsigns: [String; 2],
}

impl RouteReference {
    /// Validate both directions of a route.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Sequence` for the first direction whose
    /// sequence breaks an authoring invariant.
    pub fn new(route_id: RouteId, directions: [DirectionSpec; 2]) -> Result<Self, ConfigError> {
        let [zero, one] = directions;
        let build = |direction: Direction, stops: Vec<StopRef>| {
            ReferenceSequence::new(stops).map_err(|source| ConfigError::Sequence {
                route_id,
                direction,
                source,
            })
        };

        let seq_zero = build(Direction::Zero, zero.stops)?;
        let seq_one = build(Direction::One, one.stops)?;

        Ok(RouteReference {
            route_id,
            sequences: [seq_zero, seq_one],
            headsigns: [zero.headsign, one.headsign],
        })
    }

    /// Returns the route ID.
    pub fn route_id(&self) -> RouteId {
        self.route_id
    }

    /// Returns the reference sequence of a direction.
    pub fn sequence(&self, direction: Direction) -> &ReferenceSequence {
        &self.sequences[direction.index()]
    }

    /// Returns the headsign of a direction.
    pub fn headsign(&self, direction: Direction) -> &str {
        &self.headsigns[direction.index()]
    }
}
