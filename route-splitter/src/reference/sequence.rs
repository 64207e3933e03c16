//! Reference sequence model.
//!
//! A `ReferenceSequence` is the hand-authored canonical stop order for one
//! direction of a route. Its `Anchor` and `Equivalent` entries are grouped
//! into matching positions: each position must be served by a trip (through
//! any one of its members) for the trip to match the direction.

use std::collections::HashMap;

use super::AnnotationKind;
use super::error::SequenceError;
use crate::domain::StopId;

/// One authored entry of a reference sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopRef {
    stop_id: StopId,
    annotation: AnnotationKind,
}

impl StopRef {
    /// Create an entry.
    pub fn new(stop_id: StopId, annotation: AnnotationKind) -> Self {
        Self {
            stop_id,
            annotation,
        }
    }

    /// Create an `Anchor` entry.
    pub fn anchor(stop_id: StopId) -> Self {
        Self::new(stop_id, AnnotationKind::Anchor)
    }

    /// Returns the stop ID.
    pub fn stop_id(&self) -> &StopId {
        &self.stop_id
    }

    /// Returns the annotation.
    pub fn annotation(&self) -> AnnotationKind {
        self.annotation
    }
}

/// A matching position: a run of entries that stand in for one another.
///
/// Holds at most one `Anchor`; every other member is an `Equivalent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePosition {
    anchor: Option<usize>,
}

impl ReferencePosition {
    /// Returns the entry index of the anchor, if the position has one.
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }
}

/// The authored canonical stop order for one direction of a route.
///
/// # Invariants
///
/// - No two `Anchor` entries share a stop ID
/// - A `SharedAmbiguous` stop ID appears at most once
/// - At least one matching position
///
/// # Examples
///
/// ```
/// use route_splitter::domain::StopId;
/// use route_splitter::reference::{AnnotationKind, ReferenceSequence, StopRef};
///
/// let stop = |id: &str, kind| StopRef::new(StopId::new(id).unwrap(), kind);
/// let seq = ReferenceSequence::new(vec![
///     stop("A", AnnotationKind::Anchor),
///     stop("T", AnnotationKind::Anchor),
///     stop("S", AnnotationKind::Equivalent),
///     stop("C", AnnotationKind::Anchor),
/// ])
/// .unwrap();
///
/// // S substitutes for T, so they share a position
/// assert_eq!(seq.positions().len(), 3);
/// assert_eq!(seq.positions_of(&StopId::new("S").unwrap()), &[1]);
/// assert_eq!(seq.positions_of(&StopId::new("T").unwrap()), &[1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    entries: Vec<StopRef>,
    positions: Vec<ReferencePosition>,
    by_stop: HashMap<StopId, StopSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct StopSummary {
    positions: Vec<usize>,
    exclusive: bool,
    shared: bool,
}

impl ReferenceSequence {
    /// Build a sequence from authored entries, grouping positions and
    /// validating the invariants.
    ///
    /// An `Anchor` opens a new position unless the open position so far
    /// holds only equivalents. An `Equivalent` joins the open position, or
    /// opens one when its predecessor is not a matching entry. Exclusive and
    /// shared entries close the open position.
    pub fn new(entries: Vec<StopRef>) -> Result<Self, SequenceError> {
        let mut positions: Vec<ReferencePosition> = Vec::new();
        let mut by_stop: HashMap<StopId, StopSummary> = HashMap::new();
        let mut open: Option<usize> = None;

        for (idx, entry) in entries.iter().enumerate() {
            let kind = entry.annotation;
            if kind.is_unique_within_sequence()
                && entries[..idx]
                    .iter()
                    .any(|e| e.stop_id == entry.stop_id && e.annotation == kind)
            {
                return Err(match kind {
                    AnnotationKind::SharedAmbiguous => {
                        SequenceError::DuplicateSharedStop(entry.stop_id.clone())
                    }
                    _ => SequenceError::AmbiguousAnchorConflict(entry.stop_id.clone()),
                });
            }

            let summary = by_stop.entry(entry.stop_id.clone()).or_default();
            summary.exclusive |= kind.excludes_other_direction();
            summary.shared |= kind == AnnotationKind::SharedAmbiguous;

            let position = if !kind.is_matching_position() {
                None
            } else if kind.opens_position() {
                match open {
                    Some(p) if positions[p].anchor.is_none() => {
                        positions[p].anchor = Some(idx);
                        Some(p)
                    }
                    _ => {
                        positions.push(ReferencePosition { anchor: Some(idx) });
                        Some(positions.len() - 1)
                    }
                }
            } else {
                open.or_else(|| {
                    positions.push(ReferencePosition { anchor: None });
                    Some(positions.len() - 1)
                })
            };

            if let Some(p) = position
                && !summary.positions.contains(&p)
            {
                summary.positions.push(p);
            }
            open = position;
        }

        if positions.is_empty() {
            return Err(SequenceError::NoMatchingPositions);
        }

        Ok(ReferenceSequence {
            entries,
            positions,
            by_stop,
        })
    }

    /// Returns the authored entries.
    pub fn entries(&self) -> &[StopRef] {
        &self.entries
    }

    /// Returns the matching positions in order.
    pub fn positions(&self) -> &[ReferencePosition] {
        &self.positions
    }

    /// Returns every position `stop` can satisfy, in order.
    pub fn positions_of(&self, stop: &StopId) -> &[usize] {
        self.by_stop
            .get(stop)
            .map(|s| s.positions.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if `stop` can satisfy `position`.
    pub fn satisfies(&self, position: usize, stop: &StopId) -> bool {
        self.positions_of(stop).contains(&position)
    }

    /// Returns true if `stop` is the anchor of `position`.
    pub fn is_anchor_of(&self, position: usize, stop: &StopId) -> bool {
        self.positions
            .get(position)
            .and_then(|p| p.anchor)
            .is_some_and(|entry| &self.entries[entry].stop_id == stop)
    }

    /// Returns true if `stop` is marked exclusive to this direction.
    pub fn is_exclusive(&self, stop: &StopId) -> bool {
        self.by_stop.get(stop).is_some_and(|s| s.exclusive)
    }

    /// Returns true if `stop` is marked shared with the other direction.
    pub fn is_shared(&self, stop: &StopId) -> bool {
        self.by_stop.get(stop).is_some_and(|s| s.shared)
    }

    /// Returns the number of authored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a validated sequence.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
