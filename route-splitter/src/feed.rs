//! Route feed records: the JSON form of one route's raw trips.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, DomainError, RawTrip, RouteId, StopTimeOccurrence, TripId};

/// Errors reading a route feed file.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The file couldn't be read
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The file isn't a valid feed document
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

/// One trip as it appears in the feed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRecord {
    pub trip_id: TripId,
    #[serde(default, rename = "direction_id")]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub headsign: Option<String>,
    pub stop_times: Vec<StopTimeOccurrence>,
}

impl TripRecord {
    /// Validate the record into a raw trip.
    pub fn into_raw_trip(self) -> Result<RawTrip, DomainError> {
        Ok(RawTrip::new(self.trip_id, self.stop_times)?
            .with_declared_direction(self.direction)
            .with_headsign(self.headsign))
    }
}

/// All raw trips of one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFeed {
    pub route_id: RouteId,
    #[serde(default)]
    pub trips: Vec<TripRecord>,
}

impl RouteFeed {
    /// Parse a feed from a JSON string.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_splitter::feed::RouteFeed;
    ///
    /// let feed = RouteFeed::from_json_str(
    ///     r#"{ "route_id": 1, "trips": [
    ///         { "trip_id": "T1", "direction_id": 0,
    ///           "stop_times": [ { "stop_id": "A", "stop_sequence": 1 } ] }
    ///     ] }"#,
    /// )
    /// .unwrap();
    ///
    /// let (trips, invalid) = feed.into_raw_trips();
    /// assert_eq!(trips.len(), 1);
    /// assert!(invalid.is_empty());
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, FeedError> {
        serde_json::from_str(json).map_err(|e| FeedError::Json {
            message: e.to_string(),
        })
    }

    /// Read and parse a feed file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| FeedError::Io {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json_str(&contents)
    }

    /// Validate every record, keeping the valid trips and the errors of the
    /// invalid ones apart.
    pub fn into_raw_trips(self) -> (Vec<RawTrip>, Vec<DomainError>) {
        let mut trips = Vec::with_capacity(self.trips.len());
        let mut invalid = Vec::new();
        for record in self.trips {
            match record.into_raw_trip() {
                Ok(trip) => trips.push(trip),
                Err(e) => invalid.push(e),
            }
        }
        (trips, invalid)
    }
}
