use anyhow::Result;

use application::{export, populate, reconcile};
use infrastructure::config::AppConfig;

pub fn cmd_populate(config: &AppConfig) -> Result<()> {
    let with_routing = config.paths.routing_file.is_some();
    let outcome = populate::run(config, with_routing)?;

    println!(
        "Populated {} flows -> {}",
        outcome.rows,
        outcome.path.display()
    );
    if let Some(stats) = outcome.route_stats {
        println!(
            "Next hops: {} direct, {} via gateway, {} without route",
            stats.direct, stats.gateway, stats.no_route
        );
    }
    Ok(())
}

pub fn cmd_export(config: &AppConfig) -> Result<()> {
    let outcome = export::run(config)?;
    println!(
        "Exported {} flows into {} source documents under {}",
        outcome.flows,
        outcome.files.len(),
        config.paths.export_dir.display()
    );
    Ok(())
}

pub fn cmd_update_matrix(config: &AppConfig) -> Result<()> {
    let outcome = reconcile::run(config)?;
    println!(
        "Matrix {} written: {} rows -> {}",
        outcome.version,
        outcome.rows,
        outcome.path.display()
    );
    if let Some(stats) = outcome.route_stats {
        println!(
            "Reachability: {} direct, {} via gateway, {} without route",
            stats.direct, stats.gateway, stats.no_route
        );
    }
    Ok(())
}
