//! The populate workflow: raw flow batch + zone table in, zone-enriched
//! flow table out, with optional next-hop annotation against a routing
//! table.

use std::path::PathBuf;

use tracing::info;

use adapters::{flowfile, routingfile, zonefile};
use domain::routing::table::RouteTable;
use infrastructure::config::AppConfig;

use crate::enrichment::{annotate_next_hops, enrich_batch, RouteStats};
use crate::error::AppError;

#[derive(Debug)]
pub struct PopulateOutcome {
    pub path: PathBuf,
    pub rows: usize,
    /// Present when routing annotation ran.
    pub route_stats: Option<RouteStats>,
}

/// Run zone enrichment over the configured flow batch and write the
/// populated table. With `with_routing`, the configured routing table is
/// mandatory and every flow additionally gets a `next_hop` column.
pub fn run(config: &AppConfig, with_routing: bool) -> Result<PopulateOutcome, AppError> {
    let records = flowfile::read_flows(&config.paths.flows_path())?;
    let zones = zonefile::read_zone_table(&config.paths.zone_path())?;

    let mut enriched = enrich_batch(&records, &zones)?;
    info!(rows = enriched.len(), "flows enriched with zone data");

    let route_stats = if with_routing {
        let routing_path = config
            .paths
            .routing_file
            .as_deref()
            .ok_or(AppError::RoutingTableNotConfigured)?;
        let routes = RouteTable::new(routingfile::read_routes(routing_path)?)
            .with_local_prefix_len(config.local_prefix_len);
        let stats = annotate_next_hops(&mut enriched, &routes);
        info!(
            direct = stats.direct,
            gateway = stats.gateway,
            no_route = stats.no_route,
            "next hops computed"
        );
        Some(stats)
    } else {
        None
    };

    let path = config.paths.populated_path();
    flowfile::write_populated(&path, &enriched, with_routing)?;

    Ok(PopulateOutcome {
        path,
        rows: enriched.len(),
        route_stats,
    })
}
