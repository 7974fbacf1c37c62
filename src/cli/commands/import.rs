//! Import command implementation.

use super::stats::print_summary;
use crate::catalog::{load_catalog, CatalogStore};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the import command.
pub fn run_import(settings: &Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Import, settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let config = settings.catalog_config();
    Output::info(&format!(
        "Importing {} into {}",
        config.dataset_path.display(),
        config.store_path.display()
    ));

    let spinner = Output::spinner("Importing movies...");
    let result = load_catalog(&config);
    spinner.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            Output::error(&format!("Import failed: {}", e));
            return Err(e.into());
        }
    };

    if report.failed > 0 {
        Output::warning(&format!("{} rows were skipped:", report.failed));
        for failure in &report.failures {
            let line = failure
                .line
                .map_or_else(|| "?".to_string(), |l| l.to_string());
            Output::list_item(&format!(
                "line {}: '{}' ({})",
                line, failure.title, failure.reason
            ));
        }
    }

    Output::success("Import complete");
    Output::kv("Movies imported", &report.imported.to_string());
    Output::kv("Errors", &report.failed.to_string());

    let store = CatalogStore::open(&config.store_path)?;
    print_summary(&store, settings.catalog.sample_size)?;

    Output::info(&format!("Catalog written to {}", config.store_path.display()));
    Ok(())
}
