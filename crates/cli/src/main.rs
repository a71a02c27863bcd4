#![forbid(unsafe_code)]

mod cli;
mod commands;

use std::path::Path;

use anyhow::Result;

use cli::Command;
use infrastructure::config::AppConfig;
use infrastructure::constants::DEFAULT_CONFIG_PATH;
use infrastructure::logging;

fn main() -> Result<()> {
    let cli = cli::parse();

    if matches!(cli.command, Command::Version) {
        println!("flowmatrix {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config =
        AppConfig::load_or_default(cli.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH))?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    logging::init_logging(config.log_level, config.log_format)?;

    match cli.command {
        Command::Populate { routing_table } => {
            if let Some(path) = routing_table {
                config.paths.routing_file = Some(path);
            }
            commands::cmd_populate(&config)
        }
        Command::Export => commands::cmd_export(&config),
        Command::UpdateMatrix { routing_table } => {
            if let Some(path) = routing_table {
                config.paths.routing_file = Some(path);
            }
            commands::cmd_update_matrix(&config)
        }
        // Handled before config loading.
        Command::Version => Ok(()),
    }
}
