//! CSV adapter for flow tables: the raw input batch, the zone-enriched
//! output, and the rows of a persisted matrix version.
//!
//! Header resolution is by name, not position. The address columns
//! accept both naming variants seen in the wild (`source_ip` and the
//! bare `source` of matrix-path batches); an expected column that is
//! absent is an explicit schema error, never a silently empty field.

use std::path::Path;

use csv::StringRecord;
use thiserror::Error;

use domain::flow::entity::FlowRecord;
use domain::routing::entity::NextHop;

#[derive(Debug, Error)]
pub enum FlowFileError {
    #[error("flow file not found: {path}")]
    MissingFile { path: String },

    #[error("missing expected column '{column}' in {path}")]
    MissingColumn { column: &'static str, path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ── Header resolution ──────────────────────────────────────────────

struct Columns {
    source_name: usize,
    source_addr: usize,
    destination_name: usize,
    destination_addr: usize,
    port: usize,
    protocol: usize,
    id: Option<usize>,
    action: Option<usize>,
    description: Option<usize>,
    source_zone: Option<usize>,
    destination_zone: Option<usize>,
    next_hop: Option<usize>,
}

fn position(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

fn required(
    headers: &StringRecord,
    names: &[&str],
    label: &'static str,
    path: &Path,
) -> Result<usize, FlowFileError> {
    position(headers, names).ok_or_else(|| FlowFileError::MissingColumn {
        column: label,
        path: path.display().to_string(),
    })
}

impl Columns {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self, FlowFileError> {
        Ok(Self {
            source_name: required(headers, &["source_name"], "source_name", path)?,
            source_addr: required(headers, &["source_ip", "source"], "source_ip", path)?,
            destination_name: required(headers, &["destination_name"], "destination_name", path)?,
            destination_addr: required(
                headers,
                &["destination_ip", "destination"],
                "destination_ip",
                path,
            )?,
            port: required(headers, &["port"], "port", path)?,
            protocol: required(headers, &["protocol"], "protocol", path)?,
            id: position(headers, &["id", "rule_id"]),
            action: position(headers, &["action"]),
            description: position(headers, &["description"]),
            source_zone: position(headers, &["source_zone", "zone_source"]),
            destination_zone: position(headers, &["destination_zone", "zone_destination"]),
            next_hop: position(headers, &["next_hop"]),
        })
    }
}

fn field(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or_default().to_string()
}

fn optional_field(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    let value = record.get(idx?)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_next_hop(value: &str) -> NextHop {
    match value {
        "DIRECT" => NextHop::Direct,
        "NO_ROUTE" => NextHop::NoRoute,
        other => NextHop::Gateway(other.to_string()),
    }
}

// ── Reading ────────────────────────────────────────────────────────

/// Read a flow table. Works for raw batches, populated files and matrix
/// rows alike: optional columns that are absent or empty stay `None`.
pub fn read_flows(path: &Path) -> Result<Vec<FlowRecord>, FlowFileError> {
    if !path.exists() {
        return Err(FlowFileError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let columns = Columns::resolve(&headers, path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(FlowRecord {
            id: optional_field(&row, columns.id).and_then(|v| {
                // Matrix ids are plain integers; the populated file
                // carries display ids like "R_3" which are not reused.
                v.parse().ok()
            }),
            action: optional_field(&row, columns.action),
            source_name: field(&row, columns.source_name),
            source_addr: field(&row, columns.source_addr),
            source_zone: optional_field(&row, columns.source_zone),
            destination_name: field(&row, columns.destination_name),
            destination_addr: field(&row, columns.destination_addr),
            destination_zone: optional_field(&row, columns.destination_zone),
            port: field(&row, columns.port),
            protocol: field(&row, columns.protocol),
            description: optional_field(&row, columns.description),
            next_hop: optional_field(&row, columns.next_hop)
                .map(|v| parse_next_hop(&v)),
        });
    }

    tracing::info!(path = %path.display(), rows = records.len(), "flow table loaded");
    Ok(records)
}

// ── Writing ────────────────────────────────────────────────────────

/// Column layout of the zone-enriched flow output. `Rule_ID` carries a
/// display identifier (`R_1`, `R_2`, ...) rederived per write; the
/// `next_hop` column is only present when routing annotation ran.
pub fn write_populated(
    path: &Path,
    records: &[FlowRecord],
    with_next_hop: bool,
) -> Result<(), FlowFileError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut headers = vec![
        "Rule_ID",
        "source_name",
        "source_ip",
        "source_zone",
        "destination_name",
        "destination_ip",
        "destination_zone",
        "port",
        "protocol",
        "action",
        "description",
    ];
    if with_next_hop {
        headers.push("next_hop");
    }
    writer.write_record(&headers)?;

    for (pos, rec) in records.iter().enumerate() {
        let mut row = vec![
            format!("R_{}", pos + 1),
            rec.source_name.clone(),
            rec.source_addr.clone(),
            rec.source_zone.clone().unwrap_or_default(),
            rec.destination_name.clone(),
            rec.destination_addr.clone(),
            rec.destination_zone.clone().unwrap_or_default(),
            rec.port.clone(),
            rec.protocol.clone(),
            rec.action.clone().unwrap_or_default(),
            rec.description.clone().unwrap_or_default(),
        ];
        if with_next_hop {
            row.push(
                rec.next_hop
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    tracing::info!(path = %path.display(), rows = records.len(), "populated flow table written");
    Ok(())
}
