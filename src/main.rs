//! cinedex CLI entry point.

use anyhow::Result;
use clap::Parser;
use cinedex::cli::{commands, Cli, Commands};
use cinedex::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("cinedex={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let mut settings = Settings::load_from(config_path.as_ref())?;

    if let Some(dataset) = &cli.dataset {
        settings.dataset.path = dataset.clone();
    }
    if let Some(db) = &cli.db {
        settings.catalog.sqlite_path = db.clone();
    }

    // Execute command
    match &cli.command {
        Commands::Import => {
            commands::run_import(&settings)?;
        }

        Commands::Stats { limit } => {
            commands::run_stats(*limit, &settings)?;
        }

        Commands::Ingest {
            collection,
            batch_limit,
        } => {
            commands::run_ingest(collection.clone(), *batch_limit, settings).await?;
        }

        Commands::Search {
            query,
            limit,
            collection,
        } => {
            commands::run_search(query, *limit, collection.clone(), settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
