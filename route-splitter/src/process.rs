//! Per-route pipeline: lookup, classification, splitting, ordering and
//! headsign assignment.
//!
//! A route with a reference has every raw trip classified and split, and
//! each derived trip ordered and labelled with its direction's headsign.
//! A route without one passes its trips through unsplit with their feed
//! headsigns, merged where a rule says so. Failures stay scoped to the trip
//! that caused them.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{DerivedTrip, Direction, RawTrip, RouteId, StopTimeOccurrence, TripId};
use crate::headsign::{HeadsignMergeRules, MergeOutcome};
use crate::reference::{ReferenceRepository, RouteReference};
use crate::split::{DirectionClassifier, OrderingContext, SplitterConfig, TripError, TripSplitter};

/// One derived trip ready for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputTrip {
    pub source_trip_id: TripId,
    pub direction: Direction,
    pub headsign: String,
    /// Stop times in comparator order.
    pub stop_times: Vec<StopTimeOccurrence>,
}

/// A raw trip that produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTrip {
    pub trip_id: TripId,
    pub reason: String,
    pub error: TripError,
}

impl From<TripError> for SkippedTrip {
    fn from(error: TripError) -> Self {
        SkippedTrip {
            trip_id: error.trip_id().clone(),
            reason: error.to_string(),
            error,
        }
    }
}

/// Everything produced for one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteOutput {
    pub route_id: RouteId,
    /// Whether the route had a reference (false means passthrough).
    pub configured: bool,
    pub trips: Vec<OutputTrip>,
    pub skipped: Vec<SkippedTrip>,
}

/// Runs the pipeline for one route at a time.
///
/// # Examples
///
/// ```
/// use route_splitter::domain::{RawTrip, RouteId, StopId, StopTimeOccurrence, TripId};
/// use route_splitter::headsign::HeadsignMergeRules;
/// use route_splitter::process::RouteProcessor;
/// use route_splitter::reference::ReferenceRepositoryBuilder;
///
/// let repo = ReferenceRepositoryBuilder::new()
///     .route(1, ("Out", &[("A", ""), ("B", "")]), ("Back", &[("B", ""), ("A", "")]))
///     .build();
/// let rules = HeadsignMergeRules::new();
///
/// let occ = |id: &str, seq| StopTimeOccurrence::new(StopId::new(id).unwrap(), seq);
/// let raw = RawTrip::new(
///     TripId::new("T1").unwrap(),
///     vec![occ("A", 1), occ("B", 2), occ("A", 3)],
/// )
/// .unwrap();
///
/// let output = RouteProcessor::new(&repo, &rules).process(RouteId(1), vec![raw]);
/// assert_eq!(output.trips.len(), 2);
/// assert_eq!(output.trips[0].headsign, "Out");
/// assert_eq!(output.trips[1].headsign, "Back");
/// ```
#[derive(Debug, Clone)]
pub struct RouteProcessor<'a> {
    references: &'a ReferenceRepository,
    merge_rules: &'a HeadsignMergeRules,
    config: SplitterConfig,
}

impl<'a> RouteProcessor<'a> {
    /// Create a processor with the default configuration.
    pub fn new(references: &'a ReferenceRepository, merge_rules: &'a HeadsignMergeRules) -> Self {
        Self {
            references,
            merge_rules,
            config: SplitterConfig::default(),
        }
    }

    /// Replace the splitter configuration.
    pub fn with_config(mut self, config: SplitterConfig) -> Self {
        self.config = config;
        self
    }

    /// Process every raw trip of a route.
    pub fn process(&self, route_id: RouteId, trips: Vec<RawTrip>) -> RouteOutput {
        let raw_count = trips.len();
        let output = match self.references.route(route_id) {
            Ok(route) => self.process_configured(route, trips),
            Err(not_configured) => {
                debug!(%not_configured, "Passing trips through unsplit");
                self.passthrough(route_id, trips)
            }
        };

        debug!(
            route = %route_id,
            configured = output.configured,
            raw_trips = raw_count,
            derived_trips = output.trips.len(),
            skipped = output.skipped.len(),
            "Route processed"
        );

        output
    }

    fn process_configured(&self, route: &RouteReference, trips: Vec<RawTrip>) -> RouteOutput {
        let classifier = DirectionClassifier::new(route, &self.config);
        let splitter = TripSplitter::new(&self.config);
        let mut output = RouteOutput {
            route_id: route.route_id(),
            configured: true,
            trips: Vec::new(),
            skipped: Vec::new(),
        };

        for raw in trips {
            let derived = classifier
                .classify(&raw)
                .and_then(|classification| splitter.split(raw, classification));

            match derived {
                Ok(derived) => {
                    output
                        .trips
                        .extend(derived.iter().map(|trip| ordered(trip, route)));
                }
                Err(error) => {
                    warn!(route = %route.route_id(), %error, "Skipping trip");
                    output.skipped.push(error.into());
                }
            }
        }

        output
    }

    fn passthrough(&self, route_id: RouteId, trips: Vec<RawTrip>) -> RouteOutput {
        let mut output_trips: Vec<OutputTrip> = trips
            .into_iter()
            .map(|raw| {
                let headsign = raw.headsign().unwrap_or_default().to_string();
                let (trip_id, declared, stop_times) = raw.into_parts();
                OutputTrip {
                    source_trip_id: trip_id,
                    direction: declared.unwrap_or(self.config.default_direction),
                    headsign,
                    stop_times,
                }
            })
            .collect();

        for direction in Direction::BOTH {
            self.merge_headsigns(route_id, direction, &mut output_trips);
        }

        RouteOutput {
            route_id,
            configured: false,
            trips: output_trips,
            skipped: Vec::new(),
        }
    }

    /// Fold the distinct non-empty headsigns of one direction into as few
    /// labels as the merge rules allow.
    ///
    /// Every label starts in its own group. Two groups join when a rule
    /// covers any label of one and any label of the other, until no rule
    /// joins any pair. Earlier groups absorb later ones.
    fn merge_headsigns(&self, route_id: RouteId, direction: Direction, trips: &mut [OutputTrip]) {
        let mut groups: Vec<HeadsignGroup> = Vec::new();
        for trip in trips.iter().filter(|t| t.direction == direction) {
            let label = &trip.headsign;
            if !label.is_empty() && !groups.iter().any(|g| g.members.contains(label)) {
                groups.push(HeadsignGroup {
                    canonical: label.clone(),
                    members: vec![label.clone()],
                });
            }
        }

        while let Some((i, j, canonical)) = self.joinable(route_id, &groups) {
            let absorbed = groups.remove(j);
            groups[i].members.extend(absorbed.members);
            groups[i].canonical = canonical;
        }

        if groups.len() > 1 {
            let kept: Vec<&str> = groups.iter().map(|g| g.canonical.as_str()).collect();
            warn!(
                route = %route_id,
                %direction,
                ?kept,
                "No headsign merge rule matched"
            );
        }

        let renames: HashMap<String, String> = groups
            .into_iter()
            .flat_map(|HeadsignGroup { canonical, members }| {
                members
                    .into_iter()
                    .filter_map(move |label| (label != canonical).then(|| (label, canonical.clone())))
            })
            .collect();
        for trip in trips.iter_mut().filter(|t| t.direction == direction) {
            if let Some(label) = renames.get(&trip.headsign) {
                trip.headsign = label.clone();
            }
        }
    }

    /// The first pair of groups some rule joins, with the label they merge to.
    fn joinable(&self, route_id: RouteId, groups: &[HeadsignGroup]) -> Option<(usize, usize, String)> {
        for (i, a) in groups.iter().enumerate() {
            for (j, b) in groups.iter().enumerate().skip(i + 1) {
                for x in &a.members {
                    for y in &b.members {
                        if let MergeOutcome::Merged(canonical) = self.merge_rules.merge(route_id, x, y)
                        {
                            return Some((i, j, canonical.to_string()));
                        }
                    }
                }
            }
        }
        None
    }
}

#[derive(Debug)]
struct HeadsignGroup {
    canonical: String,
    members: Vec<String>,
}

fn ordered(trip: &DerivedTrip, route: &RouteReference) -> OutputTrip {
    let ctx = OrderingContext::new(trip, route);
    OutputTrip {
        source_trip_id: trip.source_trip_id().clone(),
        direction: trip.direction(),
        headsign: route.headsign(trip.direction()).to_string(),
        stop_times: ctx.ordered_stop_times(),
    }
}
