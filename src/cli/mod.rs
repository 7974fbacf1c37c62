//! CLI module for cinedex.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// cinedex - movie catalog and retrieval loader
///
/// Loads the movie dataset into a SQLite catalog for SQL querying and into a
/// Qdrant collection for semantic retrieval.
#[derive(Parser, Debug)]
#[command(name = "cinedex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Dataset CSV file (overrides [dataset] path)
    #[arg(long, global = true, env = "CINEDEX_DATASET")]
    pub dataset: Option<String>,

    /// SQLite catalog database (overrides [catalog] sqlite_path)
    #[arg(long, global = true, env = "CINEDEX_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the SQLite movie catalog from the dataset
    Import,

    /// Show a sample of the catalog with totals
    Stats {
        /// Number of sample rows to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Embed movie synopses and upload them to the vector collection
    Ingest {
        /// Collection to load into (overrides [vector_store] collection)
        #[arg(long)]
        collection: Option<String>,

        /// Maximum number of documents to upload
        #[arg(long)]
        batch_limit: Option<usize>,
    },

    /// Find movies whose synopsis matches a query
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Collection to search (overrides [vector_store] collection)
        #[arg(long)]
        collection: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file if none exists
    Init,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingest_overrides() {
        let cli = Cli::try_parse_from([
            "cinedex",
            "--dataset",
            "movies.csv",
            "ingest",
            "--collection",
            "films",
            "--batch-limit",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.dataset.as_deref(), Some("movies.csv"));
        match cli.command {
            Commands::Ingest { collection, batch_limit } => {
                assert_eq!(collection.as_deref(), Some("films"));
                assert_eq!(batch_limit, Some(10));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_defaults() {
        let cli = Cli::try_parse_from(["cinedex", "-vv", "search", "heist movie"]).unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Search { query, limit, collection } => {
                assert_eq!(query, "heist movie");
                assert_eq!(limit, 5);
                assert!(collection.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
