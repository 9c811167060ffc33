// SPDX-FileCopyrightText: 2026 Vendaro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vendaro - marketplace operations CLI and daemon.
//!
//! This is the binary entry point for the Vendaro backend: nightly backups,
//! backup artifact management, and carrier shipment operations.

use clap::{Parser, Subcommand};

mod backup;
mod daemon;
mod ship;

/// Vendaro - marketplace operations CLI and daemon.
#[derive(Parser, Debug)]
#[command(name = "vendaro", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the operations daemon (arms the nightly backup schedule).
    Daemon,
    /// Backup and artifact operations.
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },
    /// Look up shipping rates for an order.
    Rates {
        /// Order id.
        #[arg(long)]
        order: i64,
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Create a carrier shipment for an order.
    Ship {
        /// Order id.
        #[arg(long)]
        order: i64,
        /// Courier id; falls back to the default-courier setting.
        #[arg(long)]
        courier: Option<i64>,
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Ship every confirmed, not-yet-shipped, non-COD order.
    Autoship {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BackupCommands {
    /// Run a full backup immediately.
    Run {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// List existing backup artifacts grouped by entity.
    List {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Print the full path of one artifact.
    Path {
        /// Artifact filename.
        file: String,
    },
    /// Delete one artifact.
    Delete {
        /// Artifact filename.
        file: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match vendaro_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            vendaro_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.marketplace.log_level);

    let result = match cli.command {
        Some(Commands::Daemon) => daemon::run(&config).await,
        Some(Commands::Backup { command }) => match command {
            BackupCommands::Run { json } => backup::run(&config, json).await,
            BackupCommands::List { json } => backup::list(&config, json).await,
            BackupCommands::Path { file } => backup::path(&config, &file).await,
            BackupCommands::Delete { file } => backup::delete(&config, &file).await,
        },
        Some(Commands::Rates { order, json }) => ship::rates(&config, order, json).await,
        Some(Commands::Ship { order, courier, json }) => {
            ship::ship(&config, order, courier, json).await
        }
        Some(Commands::Autoship { json }) => ship::autoship(&config, json).await,
        None => {
            println!("vendaro: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("vendaro: {e} [{}]", e.code());
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vendaro={log_level},warn")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = vendaro_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.marketplace.name, "vendaro");
    }
}
