//! Direction of travel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a direction index is neither 0 nor 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction index {0}: must be 0 or 1")]
pub struct InvalidDirection(pub u8);

/// One of the two directions of a route (GTFS `direction_id`).
///
/// Which physical direction is 0 and which is 1 is arbitrary; the route's
/// reference configuration fixes it and attaches a headsign to each.
///
/// # Examples
///
/// ```
/// use route_splitter::domain::Direction;
///
/// let d = Direction::try_from(1).unwrap();
/// assert_eq!(d, Direction::One);
/// assert_eq!(d.opposite(), Direction::Zero);
/// assert_eq!(d.index(), 1);
///
/// assert!(Direction::try_from(2).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    Zero,
    One,
}

impl Direction {
    /// Both directions, in index order.
    pub const BOTH: [Direction; 2] = [Direction::Zero, Direction::One];

    /// Returns the numeric index (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Direction::Zero => 0,
            Direction::One => 1,
        }
    }

    /// Returns the other direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Zero => Direction::One,
            Direction::One => Direction::Zero,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = InvalidDirection;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Zero),
            1 => Ok(Direction::One),
            other => Err(InvalidDirection(other)),
        }
    }
}

impl From<Direction> for u8 {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Zero => 0,
            Direction::One => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
