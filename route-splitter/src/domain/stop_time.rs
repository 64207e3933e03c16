//! Stop-time occurrence types.
//!
//! A `StopTimeOccurrence` is one visit of a trip to a stop. An
//! `OccurrenceIndex` is the unambiguous position of that visit within its
//! trip, which matters for loops that visit the same stop twice.

use serde::{Deserialize, Serialize};

use super::StopId;

/// Index of an occurrence within a trip's stop-time sequence.
///
/// Used instead of `StopId` to tell apart repeated visits to the same stop
/// (loops returning to their origin, out-and-back detours).
///
/// # Examples
///
/// ```
/// use route_splitter::domain::OccurrenceIndex;
///
/// let idx = OccurrenceIndex::from(2);
/// assert_eq!(usize::from(idx), 2);
/// assert_eq!(idx.to_string(), "2");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OccurrenceIndex(pub usize);

impl std::fmt::Display for OccurrenceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for OccurrenceIndex {
    fn from(value: usize) -> Self {
        OccurrenceIndex(value)
    }
}

impl From<OccurrenceIndex> for usize {
    fn from(value: OccurrenceIndex) -> Self {
        value.0
    }
}

/// One visit of a trip to a stop, as published by the feed.
///
/// `sequence` is the feed's `stop_sequence`: increasing along the trip but not
/// necessarily contiguous, so gaps are normal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StopTimeOccurrence {
    pub stop_id: StopId,
    #[serde(rename = "stop_sequence")]
    pub sequence: u32,
}

impl StopTimeOccurrence {
    /// Create an occurrence.
    pub fn new(stop_id: StopId, sequence: u32) -> Self {
        Self { stop_id, sequence }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_conversions() {
        assert!(OccurrenceIndex(1) < OccurrenceIndex(2));
        assert_eq!(usize::from(OccurrenceIndex::from(5)), 5);
        assert_eq!(OccurrenceIndex(4).to_string(), "4");
    }

    #[test]
    fn occurrence_uses_feed_field_name() {
        let occ = StopTimeOccurrence::new(StopId::new("160376").unwrap(), 12);
        let json = serde_json::to_string(&occ).unwrap();
        assert_eq!(json, r#"{"stop_id":"160376","stop_sequence":12}"#);

        let parsed: StopTimeOccurrence = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, occ);
    }
}
