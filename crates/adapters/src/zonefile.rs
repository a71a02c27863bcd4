//! CSV adapter for the zone mapping table (CMDB network export).
//!
//! Column names follow the upstream export: `sous-reseau` (CIDR text),
//! `zone`, `type`. Declaration order is preserved because zone
//! resolution is first-match.

use std::path::Path;

use thiserror::Error;

use domain::net::entity::IpNetwork;
use domain::zone::entity::{ZoneEntry, ZoneTable};

#[derive(Debug, Error)]
pub enum ZoneFileError {
    #[error("zone mapping file not found: {path}")]
    MissingFile { path: String },

    #[error("missing expected column '{column}' in {path}")]
    MissingColumn { column: &'static str, path: String },

    #[error("invalid network '{value}' on line {line}: {reason}")]
    InvalidNetwork {
        line: usize,
        value: String,
        reason: String,
    },

    #[error("invalid zone entry on line {line}: {reason}")]
    InvalidEntry { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

const NETWORK_COLUMN: &str = "sous-reseau";
const ZONE_COLUMN: &str = "zone";
const KIND_COLUMN: &str = "type";

/// Load the declared zone table. Malformed rows are fatal here: a zone
/// table with holes silently changes every downstream zone assignment.
pub fn read_zone_table(path: &Path) -> Result<ZoneTable, ZoneFileError> {
    if !path.exists() {
        return Err(ZoneFileError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let column = |name: &'static str| -> Result<usize, ZoneFileError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| ZoneFileError::MissingColumn {
                column: name,
                path: path.display().to_string(),
            })
    };
    let network_idx = column(NETWORK_COLUMN)?;
    let zone_idx = column(ZONE_COLUMN)?;
    let kind_idx = column(KIND_COLUMN)?;

    let mut entries = Vec::new();
    for (pos, row) in reader.records().enumerate() {
        let row = row?;
        let line = pos + 2; // header is line 1
        let network_text = row.get(network_idx).unwrap_or_default();
        let network: IpNetwork =
            network_text
                .parse()
                .map_err(|e: domain::net::error::NetError| ZoneFileError::InvalidNetwork {
                    line,
                    value: network_text.to_string(),
                    reason: e.to_string(),
                })?;

        let entry = ZoneEntry {
            network,
            zone: row.get(zone_idx).unwrap_or_default().to_string(),
            kind: row.get(kind_idx).unwrap_or_default().to_string(),
        };
        entry
            .validate()
            .map_err(|e| ZoneFileError::InvalidEntry {
                line,
                reason: e.to_string(),
            })?;
        entries.push(entry);
    }

    tracing::info!(path = %path.display(), entries = entries.len(), "zone table loaded");
    Ok(ZoneTable::new(entries))
}
