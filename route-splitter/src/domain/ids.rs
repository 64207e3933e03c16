//! Feed identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when an identifier fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

fn validate(kind: &'static str, s: &str) -> Result<(), InvalidId> {
    if s.is_empty() {
        return Err(InvalidId {
            kind,
            reason: "cannot be empty",
        });
    }
    if s.trim() != s {
        return Err(InvalidId {
            kind,
            reason: "cannot have leading or trailing whitespace",
        });
    }
    Ok(())
}

/// A feed stop identifier (`stop_id` in GTFS, or the stop code when the
/// agency publishes one).
///
/// Stop IDs are opaque. The only validation is that they are non-empty and
/// carry no surrounding whitespace, so two IDs compare equal exactly when
/// the feed means the same stop.
///
/// # Examples
///
/// ```
/// use route_splitter::domain::StopId;
///
/// let stop = StopId::new("160376").unwrap();
/// assert_eq!(stop.as_str(), "160376");
///
/// assert!(StopId::new("").is_err());
/// assert!(StopId::new(" 160376").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Create a stop ID, rejecting empty or padded strings.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidId> {
        let s = s.into();
        validate("stop ID", &s)?;
        Ok(StopId(s))
    }

    /// Returns the stop ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StopId::new(value)
    }
}

impl From<StopId> for String {
    fn from(value: StopId) -> Self {
        value.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A feed trip identifier (`trip_id` in GTFS).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TripId(String);

impl TripId {
    /// Create a trip ID, rejecting empty or padded strings.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidId> {
        let s = s.into();
        validate("trip ID", &s)?;
        Ok(TripId(s))
    }

    /// Returns the trip ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TripId {
    type Error = InvalidId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TripId::new(value)
    }
}

impl From<TripId> for String {
    fn from(value: TripId) -> Self {
        value.0
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({})", self.0)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A route identifier.
///
/// Numeric, taken from the route short name of the feed, so it stays stable
/// across feed releases even when the agency renumbers its internal route IDs.
///
/// ```
/// use route_splitter::domain::RouteId;
///
/// let route = RouteId(14);
/// assert_eq!(route.to_string(), "14");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RouteId(pub u64);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RouteId {
    fn from(value: u64) -> Self {
        RouteId(value)
    }
}
