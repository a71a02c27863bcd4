use std::path::PathBuf;

use clap::{Parser, Subcommand};

use infrastructure::config::{LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "flowmatrix",
    about = "Network flow inventory enrichment and matrix reconciliation",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to the YAML configuration file (default: flowmatrix.yaml
    /// when present, built-in defaults otherwise)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level override (takes precedence over config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Log format override: text (development) or json (aggregators)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Enrich the flow batch with zone data and write the populated table
    Populate {
        /// Routing table (JSON) for next-hop annotation; overrides the
        /// config file. Annotation runs whenever a routing table is
        /// available from either place.
        #[arg(long)]
        routing_table: Option<PathBuf>,
    },

    /// Export the populated flows as one YAML document per source machine
    Export,

    /// Merge the flow batch into a new version of the flow matrix
    UpdateMatrix {
        /// Routing table (JSON) for the reachability check; overrides
        /// the config file.
        #[arg(long)]
        routing_table: Option<PathBuf>,
    },

    /// Display version and build information
    Version,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_populate() {
        let cli = Cli::try_parse_from(["flowmatrix", "populate"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Populate {
                routing_table: None
            }
        ));
        assert!(cli.config.is_none());
    }

    #[test]
    fn cli_populate_with_routing_table() {
        let cli = Cli::try_parse_from([
            "flowmatrix",
            "populate",
            "--routing-table",
            "routes/routing_table_FW-1.json",
        ])
        .unwrap();
        match cli.command {
            Command::Populate { routing_table } => {
                assert_eq!(
                    routing_table.unwrap(),
                    PathBuf::from("routes/routing_table_FW-1.json")
                );
            }
            _ => panic!("expected Populate command"),
        }
    }

    #[test]
    fn cli_export() {
        let cli = Cli::try_parse_from(["flowmatrix", "export"]).unwrap();
        assert!(matches!(cli.command, Command::Export));
    }

    #[test]
    fn cli_update_matrix() {
        let cli = Cli::try_parse_from(["flowmatrix", "update-matrix"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::UpdateMatrix {
                routing_table: None
            }
        ));
    }

    #[test]
    fn cli_version_subcommand() {
        let cli = Cli::try_parse_from(["flowmatrix", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn cli_custom_config_path() {
        let cli =
            Cli::try_parse_from(["flowmatrix", "--config", "/tmp/test.yaml", "export"]).unwrap();
        assert_eq!(cli.config.unwrap(), PathBuf::from("/tmp/test.yaml"));
    }

    #[test]
    fn cli_log_level_override() {
        let cli = Cli::try_parse_from(["flowmatrix", "--log-level", "debug", "export"]).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn cli_log_format_json() {
        let cli = Cli::try_parse_from(["flowmatrix", "--log-format", "json", "export"]).unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn cli_invalid_log_level_rejected() {
        assert!(Cli::try_parse_from(["flowmatrix", "--log-level", "banana", "export"]).is_err());
    }

    #[test]
    fn cli_missing_subcommand_rejected() {
        assert!(Cli::try_parse_from(["flowmatrix"]).is_err());
    }
}
