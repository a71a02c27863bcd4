//! The matrix update workflow: enrich the incoming batch, merge it into
//! the latest persisted matrix version, and publish the next version.
//!
//! All inputs are loaded before anything is written; a failure anywhere
//! leaves the version history untouched.

use std::path::PathBuf;

use tracing::info;

use adapters::matrix_store::MatrixStore;
use adapters::{flowfile, routingfile, zonefile};
use domain::matrix::reconciler::reconcile;
use domain::matrix::version::MatrixVersion;
use domain::routing::table::RouteTable;
use infrastructure::config::AppConfig;

use crate::enrichment::{annotate_next_hops, enrich_batch, RouteStats};
use crate::error::AppError;

#[derive(Debug)]
pub struct ReconcileOutcome {
    pub version: MatrixVersion,
    pub path: PathBuf,
    pub rows: usize,
    /// Reachability of the incoming batch, when a routing table was
    /// available. Informational only: the annotation itself is
    /// transient and never persisted in the matrix.
    pub route_stats: Option<RouteStats>,
}

/// Merge the configured flow batch into the matrix history.
pub fn run(config: &AppConfig) -> Result<ReconcileOutcome, AppError> {
    let records = flowfile::read_flows(&config.paths.flows_path())?;
    let zones = zonefile::read_zone_table(&config.paths.zone_path())?;

    let mut incoming = enrich_batch(&records, &zones)?;

    // Reachability check against the routing table, when one is
    // configured. Unreachable flows are surfaced, not rejected.
    let route_stats = match config.paths.routing_file.as_deref() {
        Some(routing_path) => {
            let routes = RouteTable::new(routingfile::read_routes(routing_path)?)
                .with_local_prefix_len(config.local_prefix_len);
            Some(annotate_next_hops(&mut incoming, &routes))
        }
        None => None,
    };

    let store = MatrixStore::new(config.paths.matrix_dir.clone());
    let (version, previous) = match store.load_latest()? {
        Some((latest, rows)) => (latest.next(), rows),
        None => (MatrixVersion::FIRST, Vec::new()),
    };

    let matrix = reconcile(&previous, &incoming);
    let path = store.write(version, &matrix)?;
    info!(%version, rows = matrix.len(), "matrix reconciled");

    Ok(ReconcileOutcome {
        version,
        path,
        rows: matrix.len(),
        route_stats,
    })
}
