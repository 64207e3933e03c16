//! End-to-end tests for classification, splitting and ordering.

use std::cmp::Ordering;

use super::*;
use crate::domain::{
    DerivedTrip, Direction, OccurrenceIndex, RawTrip, RouteId, StopId, StopTimeOccurrence, TripId,
};
use crate::reference::{ReferenceRepositoryBuilder, RouteReference};

fn trip(id: &str, ids: &[&str]) -> RawTrip {
    let stop_times = ids
        .iter()
        .enumerate()
        .map(|(i, s)| StopTimeOccurrence::new(StopId::new(*s).unwrap(), (i as u32 + 1) * 10))
        .collect();
    RawTrip::new(TripId::new(id).unwrap(), stop_times).unwrap()
}

fn ids(trip: &DerivedTrip) -> Vec<&str> {
    trip.stop_times().iter().map(|s| s.stop_id.as_str()).collect()
}

fn route(
    zero: &[(&str, &str)],
    one: &[(&str, &str)],
) -> RouteReference {
    ReferenceRepositoryBuilder::new()
        .route(1, ("Outbound", zero), ("Inbound", one))
        .build()
        .route(RouteId(1))
        .unwrap()
        .clone()
}

/// Classify and split in one go.
fn run(
    route: &RouteReference,
    config: &SplitterConfig,
    raw: RawTrip,
) -> Result<Vec<DerivedTrip>, TripError> {
    let classification = DirectionClassifier::new(route, config).classify(&raw)?;
    TripSplitter::new(config).split(raw, classification)
}

#[test]
fn unsplit_trip_orders_unresolved_stops_by_sequence() {
    let r = route(
        &[("A", ""), ("B", ""), ("C", "")],
        &[("C", ""), ("B", ""), ("A", "")],
    );
    let config = SplitterConfig::default();

    let derived = run(&r, &config, trip("T1", &["A", "X", "B", "Y", "C"])).unwrap();
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].direction(), Direction::Zero);

    let ctx = OrderingContext::new(&derived[0], &r);
    let order: Vec<String> = ctx
        .ordered_stop_times()
        .into_iter()
        .map(|s| s.stop_id.as_str().to_string())
        .collect();
    assert_eq!(order, vec!["A", "X", "B", "Y", "C"]);
}

#[test]
fn loop_trip_splits_at_turnaround() {
    let r = route(&[("A", ""), ("B", "")], &[("B", ""), ("A", "")]);
    let config = SplitterConfig::default();
    let raw = trip("T1", &["A", "M", "B", "N", "A"]);

    assert_eq!(
        DirectionClassifier::new(&r, &config).classify(&raw).unwrap(),
        Classification::Split {
            first: Direction::Zero,
            boundary: OccurrenceIndex(2)
        }
    );

    let derived = run(&r, &config, raw).unwrap();
    assert_eq!(derived.len(), 2);
    assert_eq!(derived[0].direction(), Direction::Zero);
    assert_eq!(ids(&derived[0]), vec!["A", "M", "B"]);
    assert_eq!(derived[1].direction(), Direction::One);
    assert_eq!(ids(&derived[1]), vec!["B", "N", "A"]);
    assert!(derived.iter().all(|d| d.source_trip_id().as_str() == "T1"));
}

#[test]
fn loop_trip_without_shared_boundary() {
    let r = route(&[("A", ""), ("B", "")], &[("B", ""), ("A", "")]);
    let config = SplitterConfig::default().with_shared_boundary(false);

    let derived = run(&r, &config, trip("T1", &["A", "M", "B", "N", "A"])).unwrap();
    assert_eq!(ids(&derived[0]), vec!["A", "M", "B"]);
    assert_eq!(ids(&derived[1]), vec!["N", "A"]);
}

#[test]
fn equivalent_stands_in_for_anchor() {
    let r = route(
        &[("A", ""), ("T", ""), ("S", "=="), ("C", "")],
        &[("C", ""), ("A", "")],
    );
    let config = SplitterConfig::default();

    let derived = run(&r, &config, trip("T1", &["A", "S", "C"])).unwrap();
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].direction(), Direction::Zero);
}

#[test]
fn unmatched_trip_is_reported() {
    let r = route(&[("A", ""), ("B", "")], &[("B", ""), ("A", "")]);
    let config = SplitterConfig::default();

    let err = run(&r, &config, trip("T4", &["A", "Z"])).unwrap_err();
    assert_eq!(
        err,
        TripError::UnmatchedTrip {
            route_id: RouteId(1),
            trip_id: TripId::new("T4").unwrap()
        }
    );
}

#[test]
fn exclusive_marker_keeps_other_directions_anchor() {
    // X is outbound-only there, but anchors the inbound origin
    let r = route(&[("A", ""), ("X", "!="), ("B", "")], &[("X", ""), ("B", ""), ("A", "")]);
    let config = SplitterConfig::default();

    let derived = run(&r, &config, trip("T1", &["X", "B", "A"])).unwrap();
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].direction(), Direction::One);
}

#[test]
fn shared_stop_orders_by_sequence() {
    let r = route(
        &[("A", ""), ("H", "<>"), ("B", "")],
        &[("B", ""), ("A", "")],
    );
    let config = SplitterConfig::default();

    let derived = run(&r, &config, trip("T1", &["A", "H", "B"])).unwrap();
    let ctx = OrderingContext::new(&derived[0], &r);
    assert_eq!(ctx.resolved_position(OccurrenceIndex(1)), None);
    assert_eq!(
        ctx.compare(
            Direction::Zero,
            &ctx.stop(OccurrenceIndex(0)),
            &ctx.stop(OccurrenceIndex(1))
        ),
        Ok(Ordering::Less)
    );
}

#[test]
fn derived_trips_of_one_raw_trip_are_incomparable() {
    let r = route(&[("A", ""), ("B", "")], &[("B", ""), ("A", "")]);
    let config = SplitterConfig::default();

    let derived = run(&r, &config, trip("T1", &["A", "B", "A"])).unwrap();
    let ctx = OrderingContext::new(&derived[0], &r);
    let other = OrderingContext::new(&derived[1], &r);

    // Same source trip ID, different direction
    let err = ctx
        .compare(
            Direction::Zero,
            &ctx.stop(OccurrenceIndex(0)),
            &other.stop(OccurrenceIndex(0)),
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "incomparable stops: stops belong to different directions"
    );
}

fn built_in(route_id: u64) -> RouteReference {
    crate::reference::west_kootenay()
        .route(RouteId(route_id))
        .unwrap()
        .clone()
}

fn classify(route: &RouteReference, ids: &[&str]) -> Result<Classification, TripError> {
    DirectionClassifier::new(route, &SplitterConfig::default()).classify(&trip("R", ids))
}

#[test]
fn built_in_route_splits_round_trip() {
    // Route 4 runs out to the airport and back as one feed trip
    let r = built_in(4);
    let config = SplitterConfig::default();

    let raw = trip("R4", &["160317", "560005", "160376", "560082", "160379"]);
    let derived = run(&r, &config, raw).unwrap();
    assert_eq!(derived.len(), 2);
    assert_eq!(ids(&derived[0]), vec!["160317", "560005", "160376"]);
    assert_eq!(ids(&derived[1]), vec!["160376", "560082", "160379"]);
}

#[test]
fn built_in_route_1_exclusive_termini() {
    let r = built_in(1);

    // Uphill only needs Ward St (or its equivalent); Hart St is a marker stop
    assert_eq!(
        classify(&r, &["160376", "160292", "160300", "160293", "160297"]),
        Ok(Classification::Single(Direction::One))
    );
    // Downtown covers all three of its positions, so it outscores Uphill
    assert_eq!(
        classify(&r, &["160297", "160305", "160300", "160340", "160341", "160376"]),
        Ok(Classification::Single(Direction::Zero))
    );

    let raw = trip("R1", &["160297", "160305", "160340", "160376", "160292", "160300", "160297"]);
    let derived = run(&r, &SplitterConfig::default(), raw).unwrap();
    assert_eq!(ids(&derived[0]), vec!["160297", "160305", "160340", "160376"]);
    assert_eq!(ids(&derived[1]), vec!["160376", "160292", "160300", "160297"]);
}

#[test]
fn built_in_route_2_equivalent_positions() {
    let r = built_in(2);
    let raw = &[
        "160359", "160338", "160395", "160515", "160351", "160376", "160350", "160342", "160336",
        "160359",
    ];

    assert_eq!(
        classify(&r, raw),
        Ok(Classification::Split {
            first: Direction::Zero,
            boundary: OccurrenceIndex(5)
        })
    );

    let derived = run(&r, &SplitterConfig::default(), trip("R2", raw)).unwrap();
    assert_eq!(
        ids(&derived[1]),
        vec!["160376", "160350", "160342", "160336", "160359"]
    );
}

#[test]
fn built_in_route_3_matches_both_directions() {
    let r = built_in(3);

    // Every Rosemont anchor in order, starting downtown
    assert_eq!(
        classify(&r, &["160376", "160275", "160311"]),
        Ok(Classification::Single(Direction::One))
    );
    assert_eq!(r.headsign(Direction::One), "Rosemont");

    assert_eq!(
        classify(&r, &["160311", "160302", "160291", "160376"]),
        Ok(Classification::Single(Direction::Zero))
    );

    let raw = &["160311", "160302", "160376", "160279", "160275", "160310", "160311"];
    assert_eq!(
        classify(&r, raw),
        Ok(Classification::Split {
            first: Direction::Zero,
            boundary: OccurrenceIndex(2)
        })
    );
    let derived = run(&r, &SplitterConfig::default(), trip("R3", raw)).unwrap();
    assert_eq!(ids(&derived[0]), vec!["160311", "160302", "160376"]);
    assert_eq!(
        ids(&derived[1]),
        vec!["160376", "160279", "160275", "160310", "160311"]
    );
}

#[test]
fn built_in_route_44_shared_stops_stay_in_feed_order() {
    let r = built_in(44);

    assert_eq!(
        classify(
            &r,
            &["160148", "160109", "160041", "160048", "160042", "160117", "160107", "160087"]
        ),
        Ok(Classification::Single(Direction::Zero))
    );

    let raw = trip(
        "R44",
        &["160148", "160109", "160041", "160087", "160106", "160042", "160108", "160148"],
    );
    let derived = run(&r, &SplitterConfig::default(), raw).unwrap();
    assert_eq!(ids(&derived[0]), vec!["160148", "160109", "160041", "160087"]);

    let inbound = &derived[1];
    assert_eq!(inbound.direction(), Direction::One);
    let ctx = OrderingContext::new(inbound, &r);
    assert_eq!(ctx.resolved_position(OccurrenceIndex(2)), None);
    let order: Vec<StopTimeOccurrence> = ctx.ordered_stop_times();
    assert_eq!(order, inbound.stop_times());
}

#[test]
fn built_in_route_45_terminus_prefers_anchor() {
    let r = built_in(45);

    // 160025 stands in for the Cedar & Spokane terminus
    assert_eq!(
        classify(&r, &["160030", "560140", "160025"]),
        Ok(Classification::Single(Direction::Zero))
    );

    // The turnaround is at the anchor, not its equivalent just before it
    assert_eq!(
        classify(
            &r,
            &["160030", "560140", "160025", "160087", "160022", "160140", "160030"]
        ),
        Ok(Classification::Split {
            first: Direction::Zero,
            boundary: OccurrenceIndex(3)
        })
    );
}

#[test]
fn built_in_dwells_repeat_terminus_stops() {
    assert_eq!(
        classify(&built_in(51), &["160207", "160207", "560050", "560050"]),
        Ok(Classification::Single(Direction::One))
    );
    assert_eq!(
        classify(&built_in(57), &["560021", "560021", "560022", "560022"]),
        Ok(Classification::Single(Direction::One))
    );
}

#[test]
fn built_in_route_58_splits_either_way() {
    let r = built_in(58);

    assert_eq!(
        classify(
            &r,
            &[
                "560048", "560067", "560069", "560088", "560021", "560022", "560069", "560068",
                "560048"
            ]
        ),
        Ok(Classification::Split {
            first: Direction::Zero,
            boundary: OccurrenceIndex(4)
        })
    );

    // Starting in Kaslo: Argenta first, then back
    assert_eq!(
        classify(&r, &["560021", "560069", "560048", "560069", "560021"]),
        Ok(Classification::Split {
            first: Direction::One,
            boundary: OccurrenceIndex(2)
        })
    );
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    const STOPS: &[&str] = &["A", "B", "C", "S", "X", "H", "Q"];

    fn test_route() -> RouteReference {
        route(
            &[("A", ""), ("B", ""), ("S", "=="), ("H", "<>"), ("C", "")],
            &[("C", ""), ("X", "!="), ("B", ""), ("A", "")],
        )
    }

    fn trip_strategy() -> impl Strategy<Value = RawTrip> {
        prop::collection::vec(prop::sample::select(STOPS.to_vec()), 1..12)
            .prop_map(|ids| trip("P1", &ids))
    }

    fn as_raw(derived: &DerivedTrip) -> RawTrip {
        RawTrip::new(
            derived.source_trip_id().clone(),
            derived.stop_times().to_vec(),
        )
        .unwrap()
    }

    /// Direction 0's anchors in order, with stops of no position around them.
    fn outbound_superset_strategy() -> impl Strategy<Value = RawTrip> {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!["Q", "X", "H"]), 0..3),
            4,
        )
        .prop_map(|noise| {
            let mut ids: Vec<&str> = Vec::new();
            for (gap, anchor) in noise.iter().zip(["A", "B", "C", ""]) {
                ids.extend(gap.iter().copied());
                if !anchor.is_empty() {
                    ids.push(anchor);
                }
            }
            trip("P1", &ids)
        })
    }

    proptest! {
        #[test]
        fn classification_is_total(raw in trip_strategy()) {
            let r = test_route();
            let config = SplitterConfig::default();
            match DirectionClassifier::new(&r, &config).classify(&raw) {
                Ok(Classification::Split { boundary, .. }) => {
                    prop_assert!(boundary.0 >= 1);
                    prop_assert!(boundary.0 + 1 < raw.len());
                }
                Ok(Classification::Single(_)) => {}
                Err(err) => prop_assert_eq!(err.trip_id(), raw.trip_id()),
            }
        }

        #[test]
        fn ordered_superset_of_one_direction_is_assigned_to_it(raw in outbound_superset_strategy()) {
            let r = test_route();
            let config = SplitterConfig::default();
            prop_assert_eq!(
                DirectionClassifier::new(&r, &config).classify(&raw),
                Ok(Classification::Single(Direction::Zero))
            );
        }

        #[test]
        fn derived_trips_match_their_direction(raw in trip_strategy()) {
            let r = test_route();
            let config = SplitterConfig::default();
            let classifier = DirectionClassifier::new(&r, &config);

            if let Ok(derived) = run(&r, &config, raw) {
                for d in &derived {
                    let m = classifier.match_direction(&as_raw(d), d.direction());
                    prop_assert!(m.is_matched(), "{:?} doesn't match", d);
                }
            }
        }

        #[test]
        fn split_covers_every_occurrence(raw in trip_strategy(), shared in any::<bool>()) {
            let r = test_route();
            let config = SplitterConfig::default().with_shared_boundary(shared);
            let original = raw.stop_times().to_vec();

            if let Ok(derived) = run(&r, &config, raw) {
                let mut joined: Vec<StopTimeOccurrence> = Vec::new();
                for (i, d) in derived.iter().enumerate() {
                    let skip = usize::from(shared && i > 0);
                    joined.extend(d.stop_times()[skip..].iter().cloned());
                }
                prop_assert_eq!(joined, original);
            }
        }

        #[test]
        fn classification_is_idempotent(raw in trip_strategy()) {
            let r = test_route();
            let config = SplitterConfig::default();
            let first = run(&r, &config, raw.clone());
            let second = run(&r, &config, raw);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn comparator_is_a_total_order(raw in trip_strategy()) {
            let r = test_route();
            let config = SplitterConfig::default();

            if let Ok(derived) = run(&r, &config, raw) {
                for d in &derived {
                    let ctx = OrderingContext::new(d, &r);
                    let dir = d.direction();
                    let stops: Vec<TripStop<'_>> =
                        (0..d.len()).map(|i| ctx.stop(OccurrenceIndex(i))).collect();
                    let cmp = |a: &TripStop<'_>, b: &TripStop<'_>| ctx.compare(dir, a, b).unwrap();

                    for a in &stops {
                        prop_assert_eq!(cmp(a, a), Ordering::Equal);
                        for b in &stops {
                            prop_assert_eq!(cmp(a, b), cmp(b, a).reverse());
                            if a.index != b.index {
                                prop_assert_ne!(cmp(a, b), Ordering::Equal);
                            }
                            for c in &stops {
                                if cmp(a, b) == Ordering::Less && cmp(b, c) == Ordering::Less {
                                    prop_assert_eq!(cmp(a, c), Ordering::Less);
                                }
                            }
                        }
                    }

                    let mut sorted = stops.clone();
                    sorted.sort_by(|a, b| cmp(a, b));
                    let expected: Vec<StopTimeOccurrence> = sorted
                        .iter()
                        .map(|s| d.stop_times()[s.index.0].clone())
                        .collect();
                    prop_assert_eq!(ctx.ordered_stop_times(), expected);
                }
            }
        }

        #[test]
        fn resolved_stops_follow_reference_position(
            stops in prop::collection::vec(
                (prop::sample::select(STOPS.to_vec()), 0u32..4),
                1..10,
            ),
            inbound in any::<bool>(),
        ) {
            // Sequence numbers tie and disagree with the reference freely
            let r = test_route();
            let dir = if inbound { Direction::One } else { Direction::Zero };
            let d = DerivedTrip::new(
                TripId::new("P1").unwrap(),
                dir,
                stops
                    .iter()
                    .map(|(id, seq)| StopTimeOccurrence::new(StopId::new(*id).unwrap(), *seq))
                    .collect(),
            );
            let ctx = OrderingContext::new(&d, &r);
            let handles: Vec<TripStop<'_>> =
                (0..d.len()).map(|i| ctx.stop(OccurrenceIndex(i))).collect();
            let cmp = |a, b| ctx.compare(dir, a, b).unwrap();

            for a in &handles {
                for b in &handles {
                    prop_assert_eq!(cmp(a, b), cmp(b, a).reverse());
                    if let (Some(pa), Some(pb)) =
                        (ctx.resolved_position(a.index), ctx.resolved_position(b.index))
                        && pa != pb
                    {
                        prop_assert_eq!(cmp(a, b), pa.cmp(&pb));
                    }
                    for c in &handles {
                        if cmp(a, b) == Ordering::Less && cmp(b, c) == Ordering::Less {
                            prop_assert_eq!(cmp(a, c), Ordering::Less);
                        }
                    }
                }
            }
        }
    }
}
