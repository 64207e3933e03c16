//! Trip splitting.

use tracing::debug;

use super::classify::Classification;
use super::config::SplitterConfig;
use super::error::TripError;
use crate::domain::{DerivedTrip, RawTrip};

/// Turns a classified raw trip into one or two derived trips.
#[derive(Debug, Clone, Copy)]
pub struct TripSplitter<'a> {
    config: &'a SplitterConfig,
}

impl<'a> TripSplitter<'a> {
    pub fn new(config: &'a SplitterConfig) -> Self {
        Self { config }
    }

    /// Split `trip` according to `classification`, consuming it.
    ///
    /// A `Single` classification yields one derived trip holding every
    /// occurrence. A `Split` yields the first direction's occurrences up to
    /// and including the boundary, then the opposite direction's from the
    /// boundary onwards (or from just after it, when the boundary is not
    /// shared).
    ///
    /// # Errors
    ///
    /// Returns `TripError::BoundaryOutOfRange` if the boundary doesn't leave
    /// a non-empty second trip.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_splitter::domain::{
    ///     Direction, OccurrenceIndex, RawTrip, StopId, StopTimeOccurrence, TripId,
    /// };
    /// use route_splitter::split::{Classification, SplitterConfig, TripSplitter};
    ///
    /// let occ = |id: &str, seq| StopTimeOccurrence::new(StopId::new(id).unwrap(), seq);
    /// let trip = RawTrip::new(
    ///     TripId::new("T1").unwrap(),
    ///     vec![occ("A", 1), occ("B", 2), occ("A", 3)],
    /// )
    /// .unwrap();
    ///
    /// let config = SplitterConfig::default();
    /// let derived = TripSplitter::new(&config)
    ///     .split(
    ///         trip,
    ///         Classification::Split {
    ///             first: Direction::Zero,
    ///             boundary: OccurrenceIndex(1),
    ///         },
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(derived.len(), 2);
    /// assert_eq!(derived[0].len(), 2);
    /// assert_eq!(derived[1].direction(), Direction::One);
    /// ```
    pub fn split(
        &self,
        trip: RawTrip,
        classification: Classification,
    ) -> Result<Vec<DerivedTrip>, TripError> {
        let (trip_id, _, mut stop_times) = trip.into_parts();

        match classification {
            Classification::Single(direction) => {
                Ok(vec![DerivedTrip::new(trip_id, direction, stop_times)])
            }
            Classification::Split { first, boundary } => {
                let len = stop_times.len();
                if boundary.0 + 1 >= len {
                    return Err(TripError::BoundaryOutOfRange {
                        trip_id,
                        boundary,
                        len,
                    });
                }

                let mut second = stop_times.split_off(boundary.0 + 1);
                if self.config.share_boundary_stop {
                    second.insert(0, stop_times[boundary.0].clone());
                }

                debug!(
                    trip = %trip_id,
                    %boundary,
                    first_len = stop_times.len(),
                    second_len = second.len(),
                    "Split trip"
                );

                Ok(vec![
                    DerivedTrip::new(trip_id.clone(), first, stop_times),
                    DerivedTrip::new(trip_id, first.opposite(), second),
                ])
            }
        }
    }
}
