//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::ingest::ingest_documents;
use crate::vector_store::QdrantStore;
use anyhow::Result;
use std::time::Duration;

/// Run the ingest command.
pub async fn run_ingest(
    collection: Option<String>,
    batch_limit: Option<usize>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ingest, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let mut config = settings.ingest_config();
    if let Some(collection) = collection {
        config.collection = collection;
    }
    if let Some(limit) = batch_limit {
        config.batch_limit = limit;
    }

    let embedder = OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    )?;
    let store = QdrantStore::new(
        settings.qdrant_url()?,
        settings.vector_store.api_key.as_deref(),
        Duration::from_secs(settings.vector_store.timeout_secs),
    )?
    .with_upload_batch_size(settings.vector_store.upload_batch_size);

    Output::info(&format!(
        "Ingesting {} into collection '{}' (limit {})",
        config.dataset_path.display(),
        config.collection,
        config.batch_limit
    ));

    let spinner = Output::spinner("Embedding and uploading documents...");
    let result = ingest_documents(&config, &store, &embedder).await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            Output::success(&format!(
                "Uploaded {} documents to '{}'",
                report.documents_uploaded, report.collection
            ));
            Output::kv("Rows read", &report.rows_read.to_string());
            if report.rows_read > report.documents_uploaded {
                Output::kv(
                    "Skipped by batch limit",
                    &(report.rows_read - report.documents_uploaded).to_string(),
                );
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Ingest failed: {}", e));
            Err(e.into())
        }
    }
}
