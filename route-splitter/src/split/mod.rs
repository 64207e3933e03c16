//! Direction classification, trip splitting and stop-time ordering.
//!
//! For a route with a reference, every raw trip goes through three steps:
//!
//! 1. `DirectionClassifier` decides which direction(s) the trip serves and,
//!    for a trip covering both, where it turns around
//! 2. `TripSplitter` cuts the trip into one derived trip per direction
//! 3. `OrderingContext` orders each derived trip's stop times for
//!    downstream consumers

mod classify;
mod compare;
mod config;
mod error;
mod splitter;

#[cfg(test)]
mod split_tests;

pub use classify::{Classification, DirectionClassifier, DirectionMatch};
pub use compare::{OrderingContext, TripStop};
pub use config::SplitterConfig;
pub use error::{IncomparableStops, TripError};
pub use splitter::TripSplitter;
