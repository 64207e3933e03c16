//! Built-in reference tables.
//!
//! Routes of the West Kootenay Transit System (BC Transit) whose feed trips
//! mix both directions and need splitting. Stops are written with the inline
//! markers understood by `AnnotationKind::parse`.

use tracing::warn;

use super::route::{DirectionSpec, RouteReference};
use super::{AnnotationKind, ReferenceRepository, StopRef};
use crate::domain::{RouteId, StopId};

/// Headsign shared by several Castlegar routes.
pub const COMMUNITY_COMPLEX: &str = "Comm Complex";

/// Builder for a reference repository from inline tables.
///
/// Provides a fluent API for adding routes. Routes that fail validation are
/// logged and skipped.
#[derive(Debug, Default)]
pub struct ReferenceRepositoryBuilder {
    inner: ReferenceRepository,
}

impl ReferenceRepositoryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route from `(headsign, [(stop_id, markers)])` tables for
    /// direction 0 and direction 1.
    pub fn route(
        mut self,
        route_id: u64,
        zero: (&str, &[(&str, &str)]),
        one: (&str, &[(&str, &str)]),
    ) -> Self {
        let route_id = RouteId(route_id);
        let built = direction(zero).and_then(|zero| {
            let one = direction(one)?;
            RouteReference::new(route_id, [zero, one]).map_err(|e| e.to_string())
        });

        match built.and_then(|route| self.inner.insert(route).map_err(|e| e.to_string())) {
            Ok(()) => {}
            Err(error) => warn!(route = %route_id, %error, "skipping built-in route"),
        }
        self
    }

    /// Build the repository.
    pub fn build(self) -> ReferenceRepository {
        self.inner
    }
}

fn direction((headsign, stops): (&str, &[(&str, &str)])) -> Result<DirectionSpec, String> {
    let stops = stops
        .iter()
        .map(|(id, markers)| {
            let stop_id = StopId::new(*id).map_err(|e| e.to_string())?;
            let kind = AnnotationKind::parse(markers).map_err(|e| e.to_string())?;
            Ok(StopRef::new(stop_id, kind))
        })
        .collect::<Result<Vec<_>, String>>()?;
    Ok(DirectionSpec::new(headsign, stops))
}

/// Reference tables for the West Kootenay Transit System bus routes.
pub fn west_kootenay() -> ReferenceRepository {
    ReferenceRepositoryBuilder::new()
        .route(
            1,
            (
                "Downtown",
                &[
                    ("160297", "<="), // Stanley St at Hart St
                    ("160305", ""),   // Robson St at Josephine St
                    ("160281", "=="),
                    ("160300", "<="),
                    ("160340", "=="),
                    ("160313", "=="), // View St at Pine St (Kootenay Lake Hospital)
                    ("160341", "!="),
                    ("160301", "!="),
                    ("160325", "!="),
                    ("160323", "!="),
                    ("160376", "=="), // Ward St at Baker St (Downtown Nelson)
                ],
            ),
            (
                "Uphill",
                &[
                    ("160376", ""),
                    ("160292", "=="),
                    ("160300", "!= =>"),
                    ("160293", "!="),
                    ("160297", "=>"),
                ],
            ),
        )
        .route(
            2,
            (
                "Downtown",
                &[
                    ("160359", "== <="), // 10th St at Kokanee (Selkirk College)
                    ("160013", "!="),
                    ("160339", "== <="),
                    ("160338", "=="),
                    ("160335", "=="),
                    ("160324", "!="),
                    ("160327", "!="),
                    ("160395", ""), // Gordon at Lakeside
                    ("160392", "=="),
                    ("160318", "!= xx"),
                    ("160326", "!= xx"),
                    ("160341", "!= =="),
                    ("160301", "!="),
                    ("160014", "!="),
                    ("160515", "=="),
                    ("160378", "!= xx"),
                    ("160351", "=="),
                    ("160304", "!="),
                    ("160281", "!="),
                    ("160376", "=="),
                ],
            ),
            (
                "Fairview",
                &[
                    ("160376", "=="),
                    ("160350", "=="),
                    ("160378", "!= xx"),
                    ("160342", "=="),
                    ("160318", "!= xx"),
                    ("160326", "!= xx"),
                    ("160325", "!= =="),
                    ("160323", "!="),
                    ("160391", "!="),
                    ("160329", "!="),
                    ("160336", "=="),
                    ("160359", "== =>"),
                ],
            ),
        )
        .route(
            3,
            (
                "Downtown",
                &[
                    ("160311", ""), // Silver King at Tower (Selkirk College)
                    ("160302", "=="),
                    ("160291", "!="),
                    ("160376", ""), // Ward St at Baker St, some trips run on to Hart St
                    ("160293", "!="),
                    ("160297", "=>"),
                ],
            ),
            (
                "Rosemont",
                &[
                    ("160376", ""),
                    ("160279", "=="),
                    ("160278", "!="),
                    ("160275", ""), // W Innes St at Crease
                    ("160368", "!="),
                    ("160310", "=="),
                    ("160311", ""),
                ],
            ),
        )
        .route(
            4,
            (
                "Downtown",
                &[("160317", ""), ("560005", "++"), ("160376", "")],
            ),
            (
                "Nelson Airport",
                &[("160376", ""), ("560082", "++"), ("160379", "")],
            ),
        )
        .route(
            14,
            (
                "Downtown",
                &[("560011", ""), ("560014", "++"), ("160376", "")],
            ),
            (
                "Blewett",
                &[
                    ("160376", ""),
                    ("160282", "=="),
                    ("160511", "!="),
                    ("160462", "=="), // Hwy 3A/6 at 1600 Block
                    ("560093", "!="),
                    ("560008", "!="),
                    ("560009", "=="),
                    ("560011", ""), // Blewett at Marrello
                ],
            ),
        )
        .route(
            15,
            (
                "Downtown",
                &[("560015", ""), ("160291", "++"), ("160376", "")],
            ),
            (
                "Perrier",
                &[("160376", ""), ("160292", "++"), ("560015", "")],
            ),
        )
        .route(
            34,
            (
                COMMUNITY_COMPLEX,
                &[("160246", ""), ("160268", "++"), ("160247", "")],
            ),
            (
                "Kinnaird",
                &[
                    ("160247", ""),
                    ("160252", "=="),
                    ("160266", "!="), // 9th at 35th St
                    ("160028", "!="),
                    ("160260", "=="),
                    ("160246", ""),
                ],
            ),
        )
        .route(
            36,
            (
                COMMUNITY_COMPLEX,
                &[
                    ("160243", ""), // Bridgeview at Lawrence
                    ("160390", "=="),
                    ("160002", "!= =>"), // Selkirk College
                    ("160348", "!="),
                    ("160247", "!= =>"),
                ],
            ),
            (
                "Bridgeview Cr",
                &[
                    ("160247", "!= <="),
                    ("160002", "!= <="),
                    ("160257", "!="),
                    ("160242", "=="),
                    ("160243", ""),
                ],
            ),
        )
        .route(
            38,
            (
                "Downtown",
                &[
                    ("160468", ""), // Osachoff at White
                    ("160470", ""),
                    ("160384", ""),
                    ("160015", ""),
                    ("160221", ""), // Columbia at 4th St
                ],
            ),
            (
                "Playmor",
                &[("160221", ""), ("160562", ""), ("160468", "")],
            ),
        )
        .route(
            41,
            (
                "Cedar & Spokane",
                &[("160024", ""), ("160025", "++"), ("160087", "")],
            ),
            (
                "Nelson & Birch",
                &[("160087", ""), ("160080", "++"), ("160024", "")],
            ),
        )
        .route(
            42,
            (
                "Cedar & Spokane",
                &[("160092", ""), ("160085", "++"), ("160087", "")],
            ),
            (
                "Daniel & End",
                &[("160087", ""), ("160096", "++"), ("160092", "")],
            ),
        )
        .route(
            44,
            (
                "Cedar & Spokane",
                &[
                    ("160148", ""), // Hillside at Viola
                    ("160109", "!= =="),
                    ("160041", "<>"),
                    ("160048", "<>"),
                    ("160042", "<>"), // Hospital Bench 1200 Block
                    ("160117", "<>"),
                    ("160107", "!= =="),
                    ("160087", ""), // Cedar at Spokane St
                ],
            ),
            (
                "Sunningdale",
                &[
                    ("160087", ""),
                    ("160106", "!="),
                    ("160041", "<>"),
                    ("160048", "<>"),
                    ("160042", "<>"),
                    ("160117", "<>"),
                    ("160108", "!="),
                    ("160148", ""),
                ],
            ),
        )
        .route(
            45,
            (
                "Cedar & Spokane",
                &[
                    ("160030", "=="), // Warfield Plant
                    ("560140", "!= <>"),
                    ("160140", "!= <>"),
                    ("160025", "=="),
                    ("160087", ""),
                ],
            ),
            (
                "Warfield Plant",
                &[
                    ("160087", ""),
                    ("160022", "=="),
                    ("560140", "<>"),
                    ("160140", "<>"),
                    ("160030", "=="),
                ],
            ),
        )
        .route(
            48,
            (
                "Fruitvale",
                &[("160038", ""), ("160130", "++"), ("160158", "")],
            ),
            (
                "Red Mountain",
                &[("160031", ""), ("160188", "++"), ("160038", "")],
            ),
        )
        .route(
            51,
            (
                "Nakusp",
                &[("560050", ""), ("160206", ""), ("160207", "")],
            ),
            // Feed trips dwell at both termini, listing each stop twice. One
            // anchor per stop still matches both visits.
            ("Hot Spgs", &[("160207", ""), ("560050", "")]),
        )
        .route(
            57,
            (
                "Seniors Hall",
                &[("560022", ""), ("560023", "++"), ("560021", "")],
            ),
            // Dwells at both termini, as on route 51
            ("Shutty Bench", &[("560021", ""), ("560022", "")]),
        )
        .route(
            58,
            (
                "Kaslo",
                &[
                    ("560048", ""), // Duncan Dam Lookout Rd (Argenta)
                    ("560067", "=="),
                    ("560069", "!= <>"),
                    ("560088", "=="),
                    ("560021", ""), // A Ave (Kaslo)
                ],
            ),
            (
                "Argenta",
                &[
                    ("560021", ""),
                    ("560022", "=="),
                    ("560069", "!= <>"),
                    ("560068", "=="),
                    ("560048", ""),
                ],
            ),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    fn stop(s: &str) -> StopId {
        StopId::new(s).unwrap()
    }

    #[test]
    fn all_routes_load() {
        let repo = west_kootenay();
        let ids: Vec<u64> = repo.route_ids().into_iter().map(|r| r.0).collect();
        assert_eq!(
            ids,
            vec![1, 2, 3, 4, 14, 15, 34, 36, 38, 41, 42, 44, 45, 48, 51, 57, 58]
        );
    }

    #[test]
    fn headsigns() {
        let repo = west_kootenay();
        let route = repo.route(RouteId(1)).unwrap();
        assert_eq!(route.headsign(Direction::Zero), "Downtown");
        assert_eq!(route.headsign(Direction::One), "Uphill");

        let route = repo.route(RouteId(34)).unwrap();
        assert_eq!(route.headsign(Direction::Zero), COMMUNITY_COMPLEX);
    }

    #[test]
    fn markers_become_annotations() {
        let repo = west_kootenay();
        let seq = repo.lookup(RouteId(44), Direction::Zero).unwrap();
        assert!(seq.is_shared(&stop("160042")));
        assert!(seq.is_exclusive(&stop("160109")));
        assert_eq!(seq.positions().len(), 2);

        let seq = repo.lookup(RouteId(3), Direction::One).unwrap();
        // 160310 (==) and 160311 share the final position
        assert_eq!(seq.positions_of(&stop("160310")), seq.positions_of(&stop("160311")));

        // Downtown ends at Ward St before running on to Hart St
        let seq = repo.lookup(RouteId(3), Direction::Zero).unwrap();
        assert_eq!(seq.positions().len(), 2);
        assert!(seq.is_anchor_of(1, &stop("160376")));
        assert!(seq.is_exclusive(&stop("160297")));
    }

    #[test]
    fn builder_skips_invalid_routes() {
        let repo = ReferenceRepositoryBuilder::new()
            .route(1, ("A", &[("X", ""), ("X", "")]), ("B", &[("Y", "")]))
            .route(2, ("A", &[("X", "??")]), ("B", &[("Y", "")]))
            .route(3, ("A", &[("", "")]), ("B", &[("Y", "")]))
            .route(4, ("A", &[("X", "")]), ("B", &[("Y", "")]))
            .route(4, ("C", &[("X", "")]), ("D", &[("Y", "")]))
            .build();

        assert_eq!(repo.route_ids(), vec![RouteId(4)]);
        assert_eq!(
            repo.route(RouteId(4)).unwrap().headsign(Direction::Zero),
            "A"
        );
    }
}
