//! Early comparator: a total order over the stop times of one derived trip.
//!
//! Each occurrence is resolved, where possible, to a matching position of its
//! direction's reference sequence by stop ID. A stop listed at several
//! positions (a loop back to its origin) takes the first one at or after the
//! position resolved just before it. Two occurrences compare:
//!
//! 1. by reference position, when both are resolved to different positions
//! 2. otherwise by feed sequence number
//! 3. otherwise by occurrence index
//!
//! Applied pairwise those rules can cycle once the reference disagrees with
//! the feed, so every occurrence gets a sort key instead: the position it
//! resolved to, or the nearest resolved position before it, then its
//! sequence number, then its index. Resolved occurrences at different
//! positions always follow the reference; everything else keeps feed order
//! within its stretch.

use std::cmp::Ordering;

use super::error::IncomparableStops;
use crate::domain::{DerivedTrip, Direction, OccurrenceIndex, StopTimeOccurrence, TripId};
use crate::reference::RouteReference;

/// Handle to one stop time of one derived trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripStop<'t> {
    pub trip_id: &'t TripId,
    pub direction: Direction,
    pub index: OccurrenceIndex,
}

impl<'t> TripStop<'t> {
    pub fn new(trip_id: &'t TripId, direction: Direction, index: OccurrenceIndex) -> Self {
        Self {
            trip_id,
            direction,
            index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    // `None` sorts before every resolved position.
    position: Option<usize>,
    sequence: u32,
    index: usize,
}

/// Ordering context built once per derived trip.
#[derive(Debug, Clone)]
pub struct OrderingContext<'t> {
    trip: &'t DerivedTrip,
    // Occurrence index -> reference position.
    resolved: Vec<Option<usize>>,
    keys: Vec<SortKey>,
}

impl<'t> OrderingContext<'t> {
    /// Resolve the occurrences of `trip` against its direction's reference
    /// sequence in `route`.
    ///
    /// Stops with no matching position in the direction, and stops shared
    /// between directions, are left unresolved.
    pub fn new(trip: &'t DerivedTrip, route: &RouteReference) -> Self {
        let seq = route.sequence(trip.direction());
        let mut resolved = Vec::with_capacity(trip.len());
        let mut keys = Vec::with_capacity(trip.len());
        let mut last: Option<usize> = None;

        for (index, stop) in trip.stop_times().iter().enumerate() {
            let position = if seq.is_shared(&stop.stop_id) {
                None
            } else {
                let candidates = seq.positions_of(&stop.stop_id);
                candidates
                    .iter()
                    .copied()
                    .find(|&p| last.is_none_or(|l| p >= l))
                    .or_else(|| candidates.first().copied())
            };
            if position.is_some() {
                last = position;
            }
            resolved.push(position);
            keys.push(SortKey {
                position: last,
                sequence: stop.sequence,
                index,
            });
        }

        Self {
            trip,
            resolved,
            keys,
        }
    }

    /// Returns the trip being ordered.
    pub fn trip(&self) -> &'t DerivedTrip {
        self.trip
    }

    /// Returns a handle to the occurrence at `index` of this trip.
    pub fn stop(&self, index: OccurrenceIndex) -> TripStop<'t> {
        TripStop::new(self.trip.source_trip_id(), self.trip.direction(), index)
    }

    /// Returns the reference position an occurrence resolved to, if any.
    pub fn resolved_position(&self, index: OccurrenceIndex) -> Option<usize> {
        self.resolved.get(index.0).copied().flatten()
    }

    /// Compare two stops of this trip.
    ///
    /// # Errors
    ///
    /// Returns `IncomparableStops` if either stop belongs to another trip or
    /// direction, or its index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    ///
    /// use route_splitter::domain::{
    ///     Direction, OccurrenceIndex, RawTrip, RouteId, StopId, StopTimeOccurrence, TripId,
    /// };
    /// use route_splitter::reference::ReferenceRepositoryBuilder;
    /// use route_splitter::split::{Classification, OrderingContext, SplitterConfig, TripSplitter};
    ///
    /// let repo = ReferenceRepositoryBuilder::new()
    ///     .route(1, ("Out", &[("A", ""), ("B", "")]), ("Back", &[("B", ""), ("A", "")]))
    ///     .build();
    /// let route = repo.route(RouteId(1)).unwrap();
    ///
    /// let occ = |id: &str, seq| StopTimeOccurrence::new(StopId::new(id).unwrap(), seq);
    /// let raw = RawTrip::new(TripId::new("T1").unwrap(), vec![occ("A", 1), occ("X", 2), occ("B", 3)])
    ///     .unwrap();
    /// let config = SplitterConfig::default();
    /// let trips = TripSplitter::new(&config)
    ///     .split(raw, Classification::Single(Direction::Zero))
    ///     .unwrap();
    ///
    /// let ctx = OrderingContext::new(&trips[0], route);
    /// let x = ctx.stop(OccurrenceIndex(1));
    /// let b = ctx.stop(OccurrenceIndex(2));
    /// assert_eq!(ctx.compare(Direction::Zero, &x, &b), Ok(Ordering::Less));
    /// ```
    pub fn compare(
        &self,
        direction: Direction,
        a: &TripStop<'_>,
        b: &TripStop<'_>,
    ) -> Result<Ordering, IncomparableStops> {
        if a.trip_id != b.trip_id {
            return Err(IncomparableStops::new("stops belong to different trips"));
        }
        if a.direction != b.direction {
            return Err(IncomparableStops::new("stops belong to different directions"));
        }
        if direction != self.trip.direction() || a.direction != direction {
            return Err(IncomparableStops::new(
                "direction differs from the trip being ordered",
            ));
        }
        if a.trip_id != self.trip.source_trip_id() {
            return Err(IncomparableStops::new("stops belong to another trip"));
        }
        if self.trip.get(a.index).is_none() || self.trip.get(b.index).is_none() {
            return Err(IncomparableStops::new("occurrence index out of bounds"));
        }

        Ok(self.keys[a.index.0].cmp(&self.keys[b.index.0]))
    }

    /// Returns the trip's stop times in comparator order.
    pub fn ordered_stop_times(&self) -> Vec<StopTimeOccurrence> {
        let mut order: Vec<usize> = (0..self.trip.len()).collect();
        order.sort_by_key(|&i| self.keys[i]);
        order
            .into_iter()
            .map(|i| self.trip.stop_times()[i].clone())
            .collect()
    }
}
