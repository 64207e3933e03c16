//! Reference repository and configuration file loading.
//!
//! The repository is loaded once per run and is read-only afterwards. Routes
//! that fail validation are rejected individually so one mis-authored route
//! doesn't block the rest.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{ConfigError, NotConfigured};
use super::route::{DirectionSpec, RouteReference};
use super::{AnnotationKind, ReferenceSequence, StopRef};
use crate::domain::{Direction, RouteId, StopId};
use crate::headsign::{HeadsignMergeRules, MergeRule};

/// All configured route references, keyed by route ID.
#[derive(Debug, Clone, Default)]
pub struct ReferenceRepository {
    routes: HashMap<RouteId, RouteReference>,
}

impl ReferenceRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validated route.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateRoute` if the route is already present;
    /// the existing entry is kept.
    pub fn insert(&mut self, route: RouteReference) -> Result<(), ConfigError> {
        let route_id = route.route_id();
        if self.routes.contains_key(&route_id) {
            return Err(ConfigError::DuplicateRoute(route_id));
        }
        self.routes.insert(route_id, route);
        Ok(())
    }

    /// Look up the reference sequence of one direction of a route.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_splitter::domain::{Direction, RouteId};
    /// use route_splitter::reference::ReferenceRepository;
    ///
    /// let repo = ReferenceRepository::new();
    /// assert!(repo.lookup(RouteId(1), Direction::Zero).is_err());
    /// ```
    pub fn lookup(
        &self,
        route_id: RouteId,
        direction: Direction,
    ) -> Result<&ReferenceSequence, NotConfigured> {
        self.route(route_id).map(|r| r.sequence(direction))
    }

    /// Look up both directions of a route.
    pub fn route(&self, route_id: RouteId) -> Result<&RouteReference, NotConfigured> {
        self.routes.get(&route_id).ok_or(NotConfigured { route_id })
    }

    /// Returns true if the route has a reference.
    pub fn contains(&self, route_id: RouteId) -> bool {
        self.routes.contains_key(&route_id)
    }

    /// Returns the configured route IDs in ascending order.
    pub fn route_ids(&self) -> Vec<RouteId> {
        let mut ids: Vec<RouteId> = self.routes.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Returns the number of configured routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no route is configured.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// One route as written in a configuration file.
///
/// Stop IDs and markers stay raw strings until `ReferenceConfig::build`, so
/// a bad entry rejects its own route rather than the whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route_id: RouteId,
    pub directions: Vec<DirectionRecord>,
}

/// One direction of a route record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionRecord {
    pub headsign: String,
    pub stops: Vec<StopRecord>,
}

/// One stop entry of a direction record. An absent annotation is an anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    #[serde(default)]
    pub annotation: String,
}

impl DirectionRecord {
    fn into_spec(self, route_id: RouteId, direction: Direction) -> Result<DirectionSpec, ConfigError> {
        let stops = self
            .stops
            .into_iter()
            .map(|stop| {
                let stop_id = StopId::new(stop.stop_id).map_err(|source| {
                    ConfigError::InvalidStopId {
                        route_id,
                        direction,
                        source,
                    }
                })?;
                let annotation = AnnotationKind::parse(&stop.annotation).map_err(|source| {
                    ConfigError::InvalidAnnotation {
                        route_id,
                        direction,
                        source,
                    }
                })?;
                Ok(StopRef::new(stop_id, annotation))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(DirectionSpec::new(self.headsign, stops))
    }
}

/// One headsign merge rule as written in a configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRuleRecord {
    pub route_id: RouteId,
    pub labels: Vec<String>,
    pub canonical: String,
}

/// The on-disk reference configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceConfig {
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
    #[serde(default)]
    pub merge_rules: Vec<MergeRuleRecord>,
}

/// Result of loading a configuration: what loaded, and what was rejected.
#[derive(Debug, Default)]
pub struct LoadedReferences {
    pub repository: ReferenceRepository,
    pub merge_rules: HeadsignMergeRules,
    /// Per-route errors; each rejected only its own route.
    pub rejected: Vec<ConfigError>,
}

impl ReferenceConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json {
            message: e.to_string(),
        })
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json_str(&contents)
    }

    /// Validate every route and build the repository and merge rules.
    ///
    /// Invalid routes are logged and reported in `rejected`; valid ones are
    /// kept. When a route ID repeats, the first valid entry wins.
    pub fn build(self) -> LoadedReferences {
        let mut loaded = LoadedReferences::default();

        for record in self.routes {
            match build_route(record).and_then(|route| loaded.repository.insert(route)) {
                Ok(()) => {}
                Err(err) => {
                    warn!(error = %err, "rejecting route reference");
                    loaded.rejected.push(err);
                }
            }
        }

        for rule in self.merge_rules {
            loaded
                .merge_rules
                .add(rule.route_id, MergeRule::new(rule.labels, rule.canonical));
        }

        debug!(
            routes = loaded.repository.len(),
            rejected = loaded.rejected.len(),
            merge_rules = loaded.merge_rules.len(),
            "reference configuration loaded"
        );

        loaded
    }

    /// Read, parse and build a configuration file in one step.
    pub fn load(path: impl AsRef<Path>) -> Result<LoadedReferences, ConfigError> {
        Ok(Self::from_path(path)?.build())
    }
}

fn build_route(record: RouteRecord) -> Result<RouteReference, ConfigError> {
    let route_id = record.route_id;
    let found = record.directions.len();
    let [zero, one]: [DirectionRecord; 2] = record
        .directions
        .try_into()
        .map_err(|_| ConfigError::WrongDirectionCount { route_id, found })?;
    let directions = [
        zero.into_spec(route_id, Direction::Zero)?,
        one.into_spec(route_id, Direction::One)?,
    ];
    RouteReference::new(route_id, directions)
}
