//! Default locations and tunables shared across the workspace.

/// Default config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "flowmatrix.yaml";

/// Default directory holding the input tables.
pub const DEFAULT_INPUT_DIR: &str = "Input";

/// Default raw flow batch filename.
pub const DEFAULT_FLOWS_FILE: &str = "flows.csv";

/// Default zone mapping (CMDB network table) filename.
pub const DEFAULT_ZONE_FILE: &str = "cmdb_network.csv";

/// Default output filename of the zone-enriched flow table.
pub const DEFAULT_POPULATED_FILE: &str = "flows_populated.csv";

/// Default directory holding the versioned matrix files.
pub const DEFAULT_MATRIX_DIR: &str = "Flow_Matrix";

/// Default directory receiving the per-source YAML documents.
pub const DEFAULT_EXPORT_DIR: &str = "YAML_Output";
