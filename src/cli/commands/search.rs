//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::vector_store::{QdrantStore, VectorStore};
use anyhow::Result;
use std::time::Duration;

/// Run the search command.
pub async fn run_search(
    query: &str,
    limit: usize,
    collection: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let collection = collection.unwrap_or_else(|| settings.vector_store.collection.clone());
    let embedder = OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    )?;
    let store = QdrantStore::new(
        settings.qdrant_url()?,
        settings.vector_store.api_key.as_deref(),
        Duration::from_secs(settings.vector_store.timeout_secs),
    )?;

    let spinner = Output::spinner("Searching...");
    let results = match embedder.embed(query).await {
        Ok(vector) => store.search(&collection, &vector, limit).await,
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    match results {
        Ok(results) if results.is_empty() => {
            Output::warning("No movies found matching your query.");
        }
        Ok(results) => {
            Output::success(&format!("Found {} movies", results.len()));
            for result in &results {
                let meta = &result.document.metadata;
                Output::search_result(
                    meta.title.as_deref().unwrap_or("Untitled"),
                    meta.year.as_deref().unwrap_or("-"),
                    meta.genre.as_deref().unwrap_or("-"),
                    result.score,
                    &result.document.page_content,
                );
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
