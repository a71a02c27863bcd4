//! Versioned, append-only store for matrix snapshots.
//!
//! One CSV file per version (`Matrix_v<major>.<minor>.csv`). The latest
//! version is recomputed by scanning the directory on every call, never
//! cached. Publishing writes a temp file and renames it into place, so
//! readers only ever see fully-written versions; prior versions are
//! never rewritten or deleted.

use std::path::{Path, PathBuf};

use thiserror::Error;

use domain::flow::entity::FlowRecord;
use domain::matrix::version::MatrixVersion;

use crate::flowfile::{read_flows, FlowFileError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("matrix version {version} already exists at {path}")]
    VersionExists { version: MatrixVersion, path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    FlowFile(#[from] FlowFileError),
}

/// Fixed column order of a persisted matrix: identifier first, action
/// second, each zone column immediately after its address column.
const MATRIX_HEADERS: [&str; 11] = [
    "id",
    "action",
    "source_name",
    "source_ip",
    "source_zone",
    "destination_name",
    "destination_ip",
    "destination_zone",
    "port",
    "protocol",
    "description",
];

#[derive(Debug, Clone)]
pub struct MatrixStore {
    dir: PathBuf,
}

impl MatrixStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All persisted versions, ascending. A store directory that does
    /// not exist yet is simply empty.
    pub fn versions(&self) -> Result<Vec<MatrixVersion>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut versions = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if let Some(version) = MatrixVersion::parse_filename(name) {
                    versions.push(version);
                }
            }
        }
        versions.sort();
        Ok(versions)
    }

    pub fn latest_version(&self) -> Result<Option<MatrixVersion>, StoreError> {
        Ok(self.versions()?.into_iter().next_back())
    }

    pub fn path_of(&self, version: MatrixVersion) -> PathBuf {
        self.dir.join(version.filename())
    }

    /// Load the rows of one persisted version.
    pub fn load(&self, version: MatrixVersion) -> Result<Vec<FlowRecord>, StoreError> {
        Ok(read_flows(&self.path_of(version))?)
    }

    /// Load the newest persisted snapshot, if any.
    pub fn load_latest(&self) -> Result<Option<(MatrixVersion, Vec<FlowRecord>)>, StoreError> {
        match self.latest_version()? {
            Some(version) => Ok(Some((version, self.load(version)?))),
            None => Ok(None),
        }
    }

    /// Publish a new version. Refuses to overwrite an existing one
    /// (history is append-only) and goes through a temp file + rename
    /// so a crash mid-write never leaves a half-visible version.
    pub fn write(
        &self,
        version: MatrixVersion,
        records: &[FlowRecord],
    ) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_of(version);
        if path.exists() {
            return Err(StoreError::VersionExists {
                version,
                path: path.display().to_string(),
            });
        }

        let temp_path = self.dir.join(format!("{}.tmp", version.filename()));
        let mut writer = csv::Writer::from_path(&temp_path)?;
        writer.write_record(MATRIX_HEADERS)?;
        for rec in records {
            writer.write_record([
                rec.id.map(|id| id.to_string()).unwrap_or_default(),
                rec.action.clone().unwrap_or_default(),
                rec.source_name.clone(),
                rec.source_addr.clone(),
                rec.source_zone.clone().unwrap_or_default(),
                rec.destination_name.clone(),
                rec.destination_addr.clone(),
                rec.destination_zone.clone().unwrap_or_default(),
                rec.port.clone(),
                rec.protocol.clone(),
                rec.description.clone().unwrap_or_default(),
            ])?;
        }
        writer.flush()?;
        drop(writer);

        // Rename is atomic on the same filesystem: readers either see
        // the previous state of the directory or the complete file.
        std::fs::rename(&temp_path, &path)?;

        tracing::info!(path = %path.display(), rows = records.len(), %version, "matrix version published");
        Ok(path)
    }
}
