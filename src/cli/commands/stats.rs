//! Stats command implementation.

use crate::catalog::CatalogStore;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the stats command.
pub fn run_stats(limit: Option<usize>, settings: &Settings) -> Result<()> {
    let path = settings.sqlite_path();
    if !path.exists() {
        Output::warning(&format!(
            "No catalog at {}. Use 'cinedex import' to create it.",
            path.display()
        ));
        return Ok(());
    }

    let store = CatalogStore::open(&path)?;
    print_summary(&store, limit.unwrap_or(settings.catalog.sample_size))
}

/// Print a sample of the catalog followed by totals.
pub(super) fn print_summary(store: &CatalogStore, limit: usize) -> Result<()> {
    let summary = store.summary(limit)?;

    if summary.total == 0 {
        Output::info("The catalog is empty.");
        return Ok(());
    }

    Output::header(&format!("Sample movies (top {})", summary.sample.len()));
    for entry in &summary.sample {
        Output::catalog_entry(entry);
    }

    println!();
    Output::kv("Total movies", &summary.total.to_string());
    let average = summary
        .average_rating
        .map_or_else(|| "-".to_string(), |r| format!("{:.2}", r));
    Output::kv("Average IMDb rating", &average);

    Ok(())
}
