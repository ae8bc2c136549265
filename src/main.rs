//! chatlist - conversation list for a desktop messaging client
//!
//! Main entry point for the chatlist command-line application.

use anyhow::Result;

use chatlist::cli::{Cli, Commands};
use chatlist::commands;
use chatlist::config::Config;
use chatlist::logging::{init_logging, with_bootstrap_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration; its warnings go through a bootstrap subscriber
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = with_bootstrap_logging(|| Config::load(config_path, &cli))?;

    init_logging(&config.logging)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::List { query, json } => {
            tracing::info!("Listing conversations from {} source", config.source.source_type);
            if let Some(q) = &query {
                tracing::debug!("Using search query: {:?}", q);
            }
            commands::run_list(&config, query, json).await
        }
        Commands::Open {
            handle,
            query,
            json,
        } => {
            tracing::info!("Opening conversation {}", handle);
            commands::run_open(&config, handle, query, json).await
        }
    }
}
