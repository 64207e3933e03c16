//! Direction classification.
//!
//! A trip matches a direction when it serves every matching position of that
//! direction's reference sequence, in order, through any one member of each
//! position. Only a direction's own anchors and equivalents serve its
//! positions, so a stop the other direction marks exclusive still counts
//! wherever this direction lists it. When both directions match, the
//! classifier looks for the boundary at which the trip turns around.

use std::cmp::Ordering;

use tracing::{debug, trace};

use super::config::SplitterConfig;
use super::error::TripError;
use crate::domain::{Direction, OccurrenceIndex, RawTrip, StopTimeOccurrence};
use crate::reference::RouteReference;

/// The direction assignment of one raw trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The whole trip serves one direction.
    Single(Direction),
    /// The trip serves `first` up to and including `boundary`, then the
    /// opposite direction.
    Split {
        first: Direction,
        boundary: OccurrenceIndex,
    },
}

impl Classification {
    /// Returns the directions in the order the trip serves them.
    pub fn directions(&self) -> Vec<Direction> {
        match *self {
            Classification::Single(direction) => vec![direction],
            Classification::Split { first, .. } => vec![first, first.opposite()],
        }
    }

    /// Returns true if the trip must be split.
    pub fn is_split(&self) -> bool {
        matches!(self, Classification::Split { .. })
    }
}

/// How well a trip matches one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionMatch {
    pub direction: Direction,
    /// Most positions servable in order (longest common subsequence).
    pub score: usize,
    /// Number of matching positions in the reference sequence.
    pub positions: usize,
    /// Earliest occurrence serving each position, when all are served.
    pub embedding: Option<Vec<OccurrenceIndex>>,
}

impl DirectionMatch {
    /// Returns true if every position is served in order.
    pub fn is_matched(&self) -> bool {
        self.embedding.is_some()
    }
}

/// Assigns raw trips of one route to directions.
#[derive(Debug, Clone, Copy)]
pub struct DirectionClassifier<'a> {
    route: &'a RouteReference,
    config: &'a SplitterConfig,
}

impl<'a> DirectionClassifier<'a> {
    pub fn new(route: &'a RouteReference, config: &'a SplitterConfig) -> Self {
        Self { route, config }
    }

    /// Match a whole trip against one direction.
    pub fn match_direction(&self, trip: &RawTrip, direction: Direction) -> DirectionMatch {
        let stops = trip.stop_times();
        let embedding = self
            .embed(direction, stops)
            .map(|e| e.into_iter().map(OccurrenceIndex).collect());
        DirectionMatch {
            direction,
            score: self.score(direction, stops),
            positions: self.route.sequence(direction).positions().len(),
            embedding,
        }
    }

    /// Classify a trip.
    ///
    /// # Errors
    ///
    /// - `TripError::UnmatchedTrip` if neither direction matches
    /// - `TripError::AmbiguousTrip` if both match, no split is valid, both
    ///   score equally, neither has more exclusive stops and the feed
    ///   declares no direction
    pub fn classify(&self, trip: &RawTrip) -> Result<Classification, TripError> {
        let zero = self.match_direction(trip, Direction::Zero);
        let one = self.match_direction(trip, Direction::One);

        trace!(
            trip = %trip.trip_id(),
            zero_score = zero.score,
            zero_positions = zero.positions,
            one_score = one.score,
            one_positions = one.positions,
            "Matched trip against both directions"
        );

        let classification = match (zero.is_matched(), one.is_matched()) {
            (false, false) => {
                return Err(TripError::UnmatchedTrip {
                    route_id: self.route.route_id(),
                    trip_id: trip.trip_id().clone(),
                });
            }
            (true, false) => Classification::Single(Direction::Zero),
            (false, true) => Classification::Single(Direction::One),
            (true, true) => self.resolve_both(trip, &zero, &one)?,
        };

        debug!(
            trip = %trip.trip_id(),
            ?classification,
            "Classified trip"
        );

        Ok(classification)
    }

    fn resolve_both(
        &self,
        trip: &RawTrip,
        zero: &DirectionMatch,
        one: &DirectionMatch,
    ) -> Result<Classification, TripError> {
        if let Some(boundary) = self.split_boundary(trip, zero) {
            return Ok(Classification::Split {
                first: Direction::Zero,
                boundary,
            });
        }
        if self.config.allow_reverse_split
            && let Some(boundary) = self.split_boundary(trip, one)
        {
            return Ok(Classification::Split {
                first: Direction::One,
                boundary,
            });
        }

        let stops = trip.stop_times();
        let by_exclusive = || {
            self.exclusive_hits(Direction::Zero, stops)
                .cmp(&self.exclusive_hits(Direction::One, stops))
        };
        match zero.score.cmp(&one.score).then_with(by_exclusive) {
            Ordering::Greater => Ok(Classification::Single(Direction::Zero)),
            Ordering::Less => Ok(Classification::Single(Direction::One)),
            Ordering::Equal => trip
                .declared_direction()
                .map(Classification::Single)
                .ok_or_else(|| TripError::AmbiguousTrip {
                    route_id: self.route.route_id(),
                    trip_id: trip.trip_id().clone(),
                }),
        }
    }

    /// The boundary of a split that serves `first` then its opposite: the
    /// occurrence serving `first`'s last position. Valid only when the
    /// opposite direction matches from the boundary onwards and both parts
    /// span at least two occurrences.
    fn split_boundary(&self, trip: &RawTrip, first: &DirectionMatch) -> Option<OccurrenceIndex> {
        let boundary = *first.embedding.as_ref()?.last()?;
        let len = trip.len();
        if boundary.0 < 1 || len - boundary.0 < 2 {
            trace!(
                trip = %trip.trip_id(),
                %boundary,
                "Split boundary leaves a part too short"
            );
            return None;
        }

        let second = first.direction.opposite();
        self.embed(second, &trip.stop_times()[boundary.0..])
            .map(|_| boundary)
    }

    /// Occurrences of stops that only `direction` serves: marked exclusive
    /// there and absent from the other direction's matching positions.
    fn exclusive_hits(&self, direction: Direction, stops: &[StopTimeOccurrence]) -> usize {
        let own = self.route.sequence(direction);
        let other = self.route.sequence(direction.opposite());
        stops
            .iter()
            .filter(|s| own.is_exclusive(&s.stop_id) && other.positions_of(&s.stop_id).is_empty())
            .count()
    }

    /// Greedy earliest embedding of every position of `direction` into
    /// `stops`. The last position prefers its anchor stop, so a trip that
    /// passes an equivalent before reaching the terminus turns around at the
    /// terminus.
    fn embed(&self, direction: Direction, stops: &[StopTimeOccurrence]) -> Option<Vec<usize>> {
        let seq = self.route.sequence(direction);
        let count = seq.positions().len();
        let mut embedding = Vec::with_capacity(count);
        let mut next = 0;

        for position in 0..count {
            let serves = |i: &usize| seq.satisfies(position, &stops[*i].stop_id);
            let found = if position + 1 == count {
                (next..stops.len())
                    .filter(serves)
                    .find(|&i| seq.is_anchor_of(position, &stops[i].stop_id))
                    .or_else(|| (next..stops.len()).find(serves))
            } else {
                (next..stops.len()).find(serves)
            }?;
            embedding.push(found);
            next = found + 1;
        }

        Some(embedding)
    }

    /// Length of the longest common subsequence between the occurrences and
    /// the positions of `direction`.
    fn score(&self, direction: Direction, stops: &[StopTimeOccurrence]) -> usize {
        let seq = self.route.sequence(direction);
        lcs_len(stops.len(), seq.positions().len(), |i, p| {
            seq.satisfies(p, &stops[i].stop_id)
        })
    }
}

/// Longest common subsequence length of two sequences of lengths `n` and
/// `m`, where `matches(i, j)` says element `i` of the first pairs with
/// element `j` of the second.
pub(crate) fn lcs_len(n: usize, m: usize, matches: impl Fn(usize, usize) -> bool) -> usize {
    let mut prev = vec![0usize; m + 1];
    let mut cur = vec![0usize; m + 1];
    for i in 0..n {
        for j in 0..m {
            cur[j + 1] = if matches(i, j) {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[m]
}
