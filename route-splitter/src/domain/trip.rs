//! Raw and derived trip types.
//!
//! A `RawTrip` is what ingestion hands over: one feed trip, possibly covering
//! both directions of its route. A `DerivedTrip` is what comes out of the
//! splitter: a trip bound to exactly one direction.

use serde::Serialize;

use super::{Direction, DomainError, OccurrenceIndex, StopTimeOccurrence, TripId};

/// A trip as published by the feed.
///
/// # Invariants
///
/// - At least one stop-time occurrence
/// - Occurrences are in non-decreasing `sequence` order; occurrences with
///   equal sequence numbers keep their input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrip {
    trip_id: TripId,
    declared_direction: Option<Direction>,
    headsign: Option<String>,
    stop_times: Vec<StopTimeOccurrence>,
}

impl RawTrip {
    /// Construct a raw trip, ordering its occurrences by sequence number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyTrip` if `stop_times` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_splitter::domain::{RawTrip, StopId, StopTimeOccurrence, TripId};
    ///
    /// let occ = |id: &str, seq| StopTimeOccurrence::new(StopId::new(id).unwrap(), seq);
    /// let trip = RawTrip::new(
    ///     TripId::new("T1").unwrap(),
    ///     vec![occ("B", 2), occ("A", 1)],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(trip.stop_times()[0].stop_id.as_str(), "A");
    /// assert_eq!(trip.len(), 2);
    /// ```
    pub fn new(
        trip_id: TripId,
        mut stop_times: Vec<StopTimeOccurrence>,
    ) -> Result<Self, DomainError> {
        if stop_times.is_empty() {
            return Err(DomainError::EmptyTrip(trip_id));
        }
        // Stable, so duplicate sequence numbers keep feed order.
        stop_times.sort_by_key(|st| st.sequence);

        Ok(RawTrip {
            trip_id,
            declared_direction: None,
            headsign: None,
            stop_times,
        })
    }

    /// Set the direction the feed declares for this trip.
    pub fn with_declared_direction(mut self, direction: Option<Direction>) -> Self {
        self.declared_direction = direction;
        self
    }

    /// Set the feed headsign of this trip.
    pub fn with_headsign(mut self, headsign: Option<String>) -> Self {
        self.headsign = headsign;
        self
    }

    /// Returns the feed trip ID.
    pub fn trip_id(&self) -> &TripId {
        &self.trip_id
    }

    /// Returns the direction declared by the feed, if any.
    pub fn declared_direction(&self) -> Option<Direction> {
        self.declared_direction
    }

    /// Returns the feed headsign, if any.
    pub fn headsign(&self) -> Option<&str> {
        self.headsign.as_deref()
    }

    /// Returns the ordered stop-time occurrences.
    pub fn stop_times(&self) -> &[StopTimeOccurrence] {
        &self.stop_times
    }

    /// Returns the number of occurrences (always at least one).
    pub fn len(&self) -> usize {
        self.stop_times.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.stop_times.is_empty()
    }

    pub(crate) fn into_parts(self) -> (TripId, Option<Direction>, Vec<StopTimeOccurrence>) {
        (self.trip_id, self.declared_direction, self.stop_times)
    }
}

/// A trip bound to a single direction of its route.
///
/// Produced only by the trip splitter (or by passthrough for unconfigured
/// routes). One raw trip yields one derived trip, or two when it covers both
/// directions. Derived trips are never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DerivedTrip {
    source_trip_id: TripId,
    direction: Direction,
    stop_times: Vec<StopTimeOccurrence>,
}

impl DerivedTrip {
    pub(crate) fn new(
        source_trip_id: TripId,
        direction: Direction,
        stop_times: Vec<StopTimeOccurrence>,
    ) -> Self {
        debug_assert!(!stop_times.is_empty());
        Self {
            source_trip_id,
            direction,
            stop_times,
        }
    }

    /// Returns the ID of the raw trip this was derived from.
    pub fn source_trip_id(&self) -> &TripId {
        &self.source_trip_id
    }

    /// Returns the direction this trip is assigned to.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the stop-time occurrences in feed order.
    pub fn stop_times(&self) -> &[StopTimeOccurrence] {
        &self.stop_times
    }

    /// Returns the occurrence at `idx`, if in bounds.
    pub fn get(&self, idx: OccurrenceIndex) -> Option<&StopTimeOccurrence> {
        self.stop_times.get(idx.0)
    }

    /// Returns the number of occurrences.
    pub fn len(&self) -> usize {
        self.stop_times.len()
    }

    /// Returns true if the trip has no occurrences.
    pub fn is_empty(&self) -> bool {
        self.stop_times.is_empty()
    }

    /// Returns the first occurrence.
    pub fn origin(&self) -> Option<&StopTimeOccurrence> {
        self.stop_times.first()
    }

    /// Returns the last occurrence.
    pub fn terminus(&self) -> Option<&StopTimeOccurrence> {
        self.stop_times.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;

    fn occ(id: &str, seq: u32) -> StopTimeOccurrence {
        StopTimeOccurrence::new(StopId::new(id).unwrap(), seq)
    }

    fn trip_id(s: &str) -> TripId {
        TripId::new(s).unwrap()
    }

    #[test]
    fn empty_trip_rejected() {
        let err = RawTrip::new(trip_id("T1"), vec![]).unwrap_err();
        assert_eq!(err.to_string(), "trip T1 has no stop times");
    }

    #[test]
    fn sorted_by_sequence() {
        let trip = RawTrip::new(trip_id("T1"), vec![occ("C", 30), occ("A", 10), occ("B", 20)])
            .unwrap();
        let ids: Vec<&str> = trip.stop_times().iter().map(|s| s.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn equal_sequence_keeps_input_order() {
        let trip = RawTrip::new(trip_id("T1"), vec![occ("X", 5), occ("Y", 5), occ("A", 1)])
            .unwrap();
        let ids: Vec<&str> = trip.stop_times().iter().map(|s| s.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "X", "Y"]);
    }

    #[test]
    fn builder_setters() {
        let trip = RawTrip::new(trip_id("T1"), vec![occ("A", 1)])
            .unwrap()
            .with_declared_direction(Some(Direction::One))
            .with_headsign(Some("Uphill".into()));

        assert_eq!(trip.declared_direction(), Some(Direction::One));
        assert_eq!(trip.headsign(), Some("Uphill"));
        assert!(!trip.is_empty());
    }

    #[test]
    fn derived_trip_accessors() {
        let derived = DerivedTrip::new(
            trip_id("T1"),
            Direction::Zero,
            vec![occ("A", 1), occ("B", 2)],
        );
        assert_eq!(derived.source_trip_id().as_str(), "T1");
        assert_eq!(derived.direction(), Direction::Zero);
        assert_eq!(derived.origin().unwrap().stop_id.as_str(), "A");
        assert_eq!(derived.terminus().unwrap().stop_id.as_str(), "B");
        assert_eq!(derived.len(), 2);
        assert_eq!(derived.get(OccurrenceIndex(1)).unwrap().stop_id.as_str(), "B");
        assert!(derived.get(OccurrenceIndex(2)).is_none());
    }
}
