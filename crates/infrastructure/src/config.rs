//! Tool configuration: structs, parsing, and validation.
//!
//! Everything has a default so the tool runs with no config file at all;
//! an explicitly named config file that is missing is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXPORT_DIR, DEFAULT_FLOWS_FILE, DEFAULT_INPUT_DIR, DEFAULT_MATRIX_DIR,
    DEFAULT_POPULATED_FILE, DEFAULT_ZONE_FILE,
};

// ── Config errors ──────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("validation error: {field}: {message}")]
    Validation { field: String, message: String },
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Self::Yaml(e.to_string())
    }
}

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    /// Assumed prefix length of a source host's local subnet, used by
    /// the direct-delivery check of next-hop computation.
    #[serde(default = "default_local_prefix_len")]
    pub local_prefix_len: u8,

    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            local_prefix_len: default_local_prefix_len(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the given config file, or fall back to defaults when the
    /// caller named none and the default path does not exist.
    pub fn load_or_default(explicit: Option<&Path>, default_path: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None if default_path.exists() => Self::load(default_path),
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config after deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.local_prefix_len > 128 {
            return Err(ConfigError::Validation {
                field: "local_prefix_len".to_string(),
                message: format!("{} exceeds the maximum prefix length 128", self.local_prefix_len),
            });
        }
        self.paths.validate()?;
        Ok(())
    }
}

// ── Paths ──────────────────────────────────────────────────────────

/// Input/output locations. Filenames are resolved relative to
/// `input_dir`; directories stand on their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    #[serde(default = "default_flows_file")]
    pub flows_file: String,

    #[serde(default = "default_zone_file")]
    pub zone_file: String,

    #[serde(default = "default_populated_file")]
    pub populated_file: String,

    /// Routing table export (JSON). No default: next-hop annotation only
    /// runs when a routing table is configured or passed on the CLI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_file: Option<PathBuf>,

    #[serde(default = "default_matrix_dir")]
    pub matrix_dir: PathBuf,

    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            flows_file: default_flows_file(),
            zone_file: default_zone_file(),
            populated_file: default_populated_file(),
            routing_file: None,
            matrix_dir: default_matrix_dir(),
            export_dir: default_export_dir(),
        }
    }
}

impl PathsConfig {
    pub fn flows_path(&self) -> PathBuf {
        self.input_dir.join(&self.flows_file)
    }

    pub fn zone_path(&self) -> PathBuf {
        self.input_dir.join(&self.zone_file)
    }

    pub fn populated_path(&self) -> PathBuf {
        self.input_dir.join(&self.populated_file)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("paths.flows_file", &self.flows_file),
            ("paths.zone_file", &self.zone_file),
            ("paths.populated_file", &self.populated_file),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "filename must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn default_local_prefix_len() -> u8 {
    24
}
fn default_log_level() -> LogLevel {
    LogLevel::Info
}
fn default_log_format() -> LogFormat {
    LogFormat::Text
}
fn default_input_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_DIR)
}
fn default_flows_file() -> String {
    DEFAULT_FLOWS_FILE.to_string()
}
fn default_zone_file() -> String {
    DEFAULT_ZONE_FILE.to_string()
}
fn default_populated_file() -> String {
    DEFAULT_POPULATED_FILE.to_string()
}
fn default_matrix_dir() -> PathBuf {
    PathBuf::from(DEFAULT_MATRIX_DIR)
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}

// ── Log level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!(
                "invalid log level '{s}': expected error|warn|info|debug|trace"
            )),
        }
    }
}

// ── Log format ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "pretty" => Ok(Self::Text),
            _ => Err(format!("invalid log format '{s}': expected json|text")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ──────────────────────────────────────────────────

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.paths.input_dir, PathBuf::from("Input"));
        assert_eq!(config.paths.flows_file, "flows.csv");
        assert_eq!(config.paths.zone_file, "cmdb_network.csv");
        assert_eq!(config.paths.matrix_dir, PathBuf::from("Flow_Matrix"));
        assert_eq!(config.paths.export_dir, PathBuf::from("YAML_Output"));
        assert!(config.paths.routing_file.is_none());
        assert_eq!(config.local_prefix_len, 24);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config.paths.flows_file, "flows.csv");
        assert_eq!(config.local_prefix_len, 24);
    }

    #[test]
    fn paths_compose_against_input_dir() {
        let config = AppConfig::default();
        assert_eq!(config.paths.flows_path(), PathBuf::from("Input/flows.csv"));
        assert_eq!(
            config.paths.zone_path(),
            PathBuf::from("Input/cmdb_network.csv")
        );
        assert_eq!(
            config.paths.populated_path(),
            PathBuf::from("Input/flows_populated.csv")
        );
    }

    // ── Parsing ───────────────────────────────────────────────────

    #[test]
    fn full_yaml_overrides() {
        let yaml = r#"
paths:
  input_dir: /srv/flows/in
  flows_file: batch.csv
  zone_file: zones.csv
  routing_file: /srv/flows/routing_table_FW-1.json
  matrix_dir: /srv/flows/matrix
  export_dir: /srv/flows/yaml
local_prefix_len: 16
log_level: debug
log_format: json
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.paths.flows_path(), PathBuf::from("/srv/flows/in/batch.csv"));
        assert_eq!(
            config.paths.routing_file.as_deref(),
            Some(Path::new("/srv/flows/routing_table_FW-1.json"))
        );
        assert_eq!(config.local_prefix_len, 16);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(AppConfig::from_yaml("bogus_field: 1").is_err());
    }

    #[test]
    fn invalid_local_prefix_rejected() {
        assert!(AppConfig::from_yaml("local_prefix_len: 129").is_err());
    }

    #[test]
    fn empty_filename_rejected() {
        let yaml = r#"
paths:
  flows_file: ""
"#;
        assert!(AppConfig::from_yaml(yaml).is_err());
    }

    // ── Loading ───────────────────────────────────────────────────

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = AppConfig::load(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn load_or_default_without_any_file() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("flowmatrix.yaml");
        let config = AppConfig::load_or_default(None, &default_path).unwrap();
        assert_eq!(config.paths.flows_file, "flows.csv");
    }

    #[test]
    fn load_or_default_picks_up_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("flowmatrix.yaml");
        std::fs::write(&default_path, "local_prefix_len: 16\n").unwrap();
        let config = AppConfig::load_or_default(None, &default_path).unwrap();
        assert_eq!(config.local_prefix_len, 16);
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "log_level: trace\n").unwrap();
        let config = AppConfig::load_or_default(Some(&path), Path::new("unused.yaml")).unwrap();
        assert_eq!(config.log_level, LogLevel::Trace);
    }

    // ── LogLevel / LogFormat ──────────────────────────────────────

    #[test]
    fn log_level_from_str() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("banana".parse::<LogLevel>().is_err());
    }

    #[test]
    fn log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
