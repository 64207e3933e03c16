//! Domain types for route splitting.
//!
//! This module contains the feed-side model: identifiers, directions, stop
//! times and trips. All types enforce their invariants at construction time,
//! so code that receives these types can trust their validity.

mod direction;
mod error;
mod ids;
mod stop_time;
mod trip;

pub use direction::{Direction, InvalidDirection};
pub use error::DomainError;
pub use ids::{InvalidId, RouteId, StopId, TripId};
pub use stop_time::{OccurrenceIndex, StopTimeOccurrence};
pub use trip::{DerivedTrip, RawTrip};
