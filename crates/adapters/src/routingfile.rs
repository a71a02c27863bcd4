//! JSON adapter for the routing table export (appliance dump with
//! `Address` / `Gateway` fields).

use std::path::Path;

use thiserror::Error;

use domain::routing::entity::RouteEntry;

#[derive(Debug, Error)]
pub enum RoutingFileError {
    #[error("routing table file not found: {path}")]
    MissingFile { path: String },

    #[error("invalid routing table JSON in {path}: {reason}")]
    InvalidJson { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the declared route list. Entries with unparseable networks are
/// kept here and skipped at lookup time (`RouteTable` treats them as
/// non-matching); a file that is not a JSON array of route objects is
/// fatal.
pub fn read_routes(path: &Path) -> Result<Vec<RouteEntry>, RoutingFileError> {
    if !path.exists() {
        return Err(RoutingFileError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let routes: Vec<RouteEntry> =
        serde_json::from_str(&content).map_err(|e| RoutingFileError::InvalidJson {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    tracing::info!(path = %path.display(), routes = routes.len(), "routing table loaded");
    Ok(routes)
}
