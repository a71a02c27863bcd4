//! The export workflow: group the populated flow table by source machine
//! and emit one YAML document per source.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::info;

use adapters::{export as yaml_export, flowfile};
use domain::flow::entity::FlowRecord;
use infrastructure::config::AppConfig;

use crate::error::AppError;

#[derive(Debug)]
pub struct ExportOutcome {
    pub files: Vec<PathBuf>,
    pub flows: usize,
}

/// Group flows by source display name, sorted by name. Within one
/// source, flows keep their table order.
pub fn group_by_source(records: &[FlowRecord]) -> BTreeMap<&str, Vec<&FlowRecord>> {
    let mut groups: BTreeMap<&str, Vec<&FlowRecord>> = BTreeMap::new();
    for rec in records {
        groups.entry(rec.source_name.as_str()).or_default().push(rec);
    }
    groups
}

/// Export the populated flow table as one YAML document per source.
pub fn run(config: &AppConfig) -> Result<ExportOutcome, AppError> {
    let records = flowfile::read_flows(&config.paths.populated_path())?;

    std::fs::create_dir_all(&config.paths.export_dir)?;

    let mut files = Vec::new();
    for (source, flows) in group_by_source(&records) {
        let path = yaml_export::write_source_document(&config.paths.export_dir, source, &flows)?;
        info!(source, flows = flows.len(), path = %path.display(), "source document written");
        files.push(path);
    }

    Ok(ExportOutcome {
        files,
        flows: records.len(),
    })
}
