//! Pre-flight checks before expensive operations.
//!
//! Validates that required files and configuration are available before
//! starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{CinedexError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Catalog import requires the dataset.
    Import,
    /// Ingest requires the dataset, an API key and a vector endpoint.
    Ingest,
    /// Search requires an API key and a vector endpoint.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Import => {
            check_dataset(&settings.dataset_path())?;
        }
        Operation::Ingest => {
            check_dataset(&settings.dataset_path())?;
            check_api_key()?;
            settings.qdrant_url()?;
        }
        Operation::Search => {
            check_api_key()?;
            settings.qdrant_url()?;
        }
    }
    Ok(())
}

/// Check that the dataset file exists.
fn check_dataset(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CinedexError::Config(format!(
            "Dataset file not found at {}. Pass --dataset or set [dataset] path.",
            path.display()
        )))
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(CinedexError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(CinedexError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}
