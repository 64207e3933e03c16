use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_splitter::feed::RouteFeed;
use route_splitter::headsign::west_kootenay_merge_rules;
use route_splitter::process::RouteProcessor;
use route_splitter::reference::{LoadedReferences, ReferenceConfig, west_kootenay};

const USAGE: &str = "usage: route-splitter <route-trips.json> [reference.json]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (feed_path, reference_path) = match args.as_slice() {
        [feed] => (feed, None),
        [feed, reference] => (feed, Some(reference)),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(feed_path, reference_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Route splitting failed");
            ExitCode::FAILURE
        }
    }
}

fn run(feed_path: &str, reference_path: Option<&String>) -> Result<(), Box<dyn std::error::Error>> {
    let references = match reference_path {
        Some(path) => ReferenceConfig::load(path)?,
        None => LoadedReferences {
            repository: west_kootenay(),
            merge_rules: west_kootenay_merge_rules(),
            rejected: Vec::new(),
        },
    };
    info!(
        routes = references.repository.len(),
        rejected = references.rejected.len(),
        "Loaded reference sequences"
    );

    let feed = RouteFeed::from_path(feed_path)?;
    let route_id = feed.route_id;
    let (trips, invalid) = feed.into_raw_trips();
    for e in &invalid {
        warn!(route = %route_id, error = %e, "Dropping invalid trip record");
    }

    let output = RouteProcessor::new(&references.repository, &references.merge_rules)
        .process(route_id, trips);
    info!(
        route = %route_id,
        trips = output.trips.len(),
        skipped = output.skipped.len(),
        "Route split"
    );

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
