//! CLI command implementations.

mod config;
mod import;
mod ingest;
mod search;
mod stats;

pub use config::run_config;
pub use import::run_import;
pub use ingest::run_ingest;
pub use search::run_search;
pub use stats::run_stats;
