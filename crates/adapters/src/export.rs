//! YAML adapter for per-source flow documents, one file per source
//! machine, consumable by automation playbooks.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use domain::flow::entity::FlowRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(String),
}

impl From<serde_yaml_ng::Error> for ExportError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Self::Yaml(e.to_string())
    }
}

/// Fixed field subset exported per flow.
#[derive(Debug, Serialize)]
struct ExportFlow<'a> {
    source_name: &'a str,
    source_ip: &'a str,
    destination_name: &'a str,
    destination_ip: &'a str,
    port: &'a str,
    protocol: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    flows: Vec<ExportFlow<'a>>,
}

impl<'a> From<&'a FlowRecord> for ExportFlow<'a> {
    fn from(rec: &'a FlowRecord) -> Self {
        Self {
            source_name: &rec.source_name,
            source_ip: &rec.source_addr,
            destination_name: &rec.destination_name,
            destination_ip: &rec.destination_addr,
            port: &rec.port,
            protocol: &rec.protocol,
            description: rec.description.as_deref().unwrap_or_default(),
        }
    }
}

/// Write the YAML document for one source machine. Returns the path of
/// the written file. The export directory must already exist.
pub fn write_source_document(
    dir: &Path,
    source_name: &str,
    flows: &[&FlowRecord],
) -> Result<PathBuf, ExportError> {
    let document = ExportDocument {
        flows: flows.iter().map(|rec| ExportFlow::from(*rec)).collect(),
    };

    let path = dir.join(format!("{}.yml", sanitize_filename(source_name)));
    let yaml = serde_yaml_ng::to_string(&document)?;
    std::fs::write(&path, yaml)?;
    Ok(path)
}

// Source names come from user-maintained tables; keep path separators
// out of the generated filenames.
fn sanitize_filename(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(source: &str, dst: &str, port: &str) -> FlowRecord {
        FlowRecord {
            id: None,
            action: None,
            source_name: source.to_string(),
            source_addr: "10.0.0.1".to_string(),
            source_zone: Some("dmz".to_string()),
            destination_name: format!("host-{dst}"),
            destination_addr: dst.to_string(),
            destination_zone: None,
            port: port.to_string(),
            protocol: "tcp".to_string(),
            description: Some("nightly sync".to_string()),
            next_hop: None,
        }
    }

    #[test]
    fn document_contains_fixed_field_subset() {
        let dir = tempdir().unwrap();
        let rec = record("P_web", "10.0.0.2", "443");
        let path = write_source_document(dir.path(), "P_web", &[&rec]).unwrap();

        assert_eq!(path.file_name().unwrap(), "P_web.yml");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("flows:"));
        assert!(content.contains("source_name: P_web"));
        assert!(content.contains("source_ip: 10.0.0.1"));
        assert!(content.contains("destination_ip: 10.0.0.2"));
        assert!(content.contains("port: '443'"));
        assert!(content.contains("description: nightly sync"));
        // Zones and ids are not part of the export subset.
        assert!(!content.contains("zone"));
        assert!(!content.contains("id:"));
    }

    #[test]
    fn document_lists_flows_in_given_order() {
        let dir = tempdir().unwrap();
        let first = record("P_web", "10.0.0.2", "443");
        let second = record("P_web", "10.0.0.3", "80");
        let path = write_source_document(dir.path(), "P_web", &[&first, &second]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let pos_first = content.find("10.0.0.2").unwrap();
        let pos_second = content.find("10.0.0.3").unwrap();
        assert!(pos_first < pos_second);
    }

    #[test]
    fn missing_description_serializes_empty() {
        let dir = tempdir().unwrap();
        let mut rec = record("P_app", "10.0.0.2", "22");
        rec.description = None;
        let path = write_source_document(dir.path(), "P_app", &[&rec]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("description: ''"));
    }

    #[test]
    fn filenames_cannot_escape_export_dir() {
        let dir = tempdir().unwrap();
        let rec = record("../evil", "10.0.0.2", "22");
        let path = write_source_document(dir.path(), "../evil", &[&rec]).unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.file_name().unwrap(), ".._evil.yml");
    }
}
