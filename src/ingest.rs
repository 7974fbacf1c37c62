//! Retrieval document ingestion.
//!
//! Reads the whole dataset, projects every row into a [`RetrievalDocument`],
//! keeps the first `batch_limit` documents and hands them to the vector store
//! in one bulk load. Upload failures abort the run; there is no retry and no
//! partial-success accounting.

use crate::dataset::{Dataset, SourceRecord};
use crate::document::RetrievalDocument;
use crate::embedding::Embedder;
use crate::error::{CinedexError, Result};
use crate::vector_store::VectorStore;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Maximum number of documents uploaded per run. Keeps embedding cost bounded.
pub const DEFAULT_BATCH_LIMIT: usize = 100;

/// Explicit inputs of the document builder.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// CSV file to read.
    pub dataset_path: PathBuf,
    /// Target collection name.
    pub collection: String,
    /// Documents beyond this many are not uploaded.
    pub batch_limit: usize,
}

/// Outcome of an ingest run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Rows read from the dataset.
    pub rows_read: usize,
    /// Documents handed to the vector store.
    pub documents_uploaded: usize,
    pub collection: String,
}

/// One document per record, in file order.
pub fn build_documents(records: &[SourceRecord]) -> Vec<RetrievalDocument> {
    records.iter().map(RetrievalDocument::from_record).collect()
}

/// Keep at most `limit` documents from the front of the batch.
pub fn apply_batch_limit(mut docs: Vec<RetrievalDocument>, limit: usize) -> Vec<RetrievalDocument> {
    if docs.len() > limit {
        info!(
            "Batch limit {} reached, skipping {} documents",
            limit,
            docs.len() - limit
        );
        docs.truncate(limit);
    }
    docs
}

/// Build documents from the dataset and bulk-load them into the collection.
///
/// Repeated runs add the documents again; the collection is never cleared.
#[instrument(skip_all, fields(collection = %config.collection))]
pub async fn ingest_documents(
    config: &IngestConfig,
    store: &dyn VectorStore,
    embedder: &dyn Embedder,
) -> Result<IngestReport> {
    if config.collection.trim().is_empty() {
        return Err(CinedexError::Config("Collection name is empty".to_string()));
    }
    if config.batch_limit == 0 {
        return Err(CinedexError::Config(
            "Batch limit must be at least 1".to_string(),
        ));
    }

    let dataset = Dataset::open(&config.dataset_path)?;
    let records = dataset.read_all()?;
    info!(
        "Read {} rows from {}",
        records.len(),
        config.dataset_path.display()
    );

    let docs = apply_batch_limit(build_documents(&records), config.batch_limit);
    let uploaded = store
        .add_documents(&config.collection, &docs, embedder)
        .await?;

    Ok(IngestReport {
        rows_read: records.len(),
        documents_uploaded: uploaded,
        collection: config.collection.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::write_dataset;
    use crate::vector_store::tests::FakeEmbedder;
    use crate::vector_store::{MemoryVectorStore, SearchResult};
    use async_trait::async_trait;

    fn rows(count: usize) -> Vec<String> {
        (1..=count)
            .map(|i| {
                format!(
                    "https://posters.example/{i}.jpg,Movie {i},{year},PG,{i}0,Drama,7.{i},Overview of movie {i}.,70,Director {i},A,B,C,D,{i}000,{i}00000",
                    i = i,
                    year = 1990 + i
                )
            })
            .collect()
    }

    fn config(path: &std::path::Path, batch_limit: usize) -> IngestConfig {
        IngestConfig {
            dataset_path: path.to_path_buf(),
            collection: "movies".to_string(),
            batch_limit,
        }
    }

    struct FailingStore;

    #[async_trait]
    impl VectorStore for FailingStore {
        async fn add_documents(
            &self,
            _collection: &str,
            _docs: &[RetrievalDocument],
            _embedder: &dyn Embedder,
        ) -> Result<usize> {
            Err(CinedexError::VectorStore("Point upsert failed (503)".to_string()))
        }

        async fn search(
            &self,
            _collection: &str,
            _query_embedding: &[f32],
            _limit: usize,
        ) -> Result<Vec<SearchResult>> {
            Ok(Vec::new())
        }

        async fn document_count(&self, _collection: &str) -> Result<usize> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_ingest_truncates_to_batch_limit() {
        let lines = rows(5);
        let file = write_dataset(&lines.iter().map(String::as_str).collect::<Vec<_>>());
        let store = MemoryVectorStore::new();
        let embedder = FakeEmbedder::default();

        let report = ingest_documents(&config(file.path(), 3), &store, &embedder)
            .await
            .unwrap();

        assert_eq!(
            report,
            IngestReport {
                rows_read: 5,
                documents_uploaded: 3,
                collection: "movies".to_string(),
            }
        );

        let docs = store.documents("movies").unwrap();
        let titles: Vec<_> = docs
            .iter()
            .filter_map(|d| d.metadata.title.as_deref())
            .collect();
        assert_eq!(titles, vec!["Movie 1", "Movie 2", "Movie 3"]);
    }

    #[tokio::test]
    async fn test_documents_carry_row_values() {
        let lines = rows(2);
        let file = write_dataset(&lines.iter().map(String::as_str).collect::<Vec<_>>());
        let store = MemoryVectorStore::new();

        ingest_documents(&config(file.path(), DEFAULT_BATCH_LIMIT), &store, &FakeEmbedder::default())
            .await
            .unwrap();

        let docs = store.documents("movies").unwrap();
        assert_eq!(docs.len(), 2);
        for (i, doc) in docs.iter().enumerate() {
            let n = i + 1;
            assert!(doc.page_content.contains(&format!("Movie {}", n)));
            assert!(doc.page_content.contains(&format!("Overview of movie {}.", n)));
            assert_eq!(
                doc.metadata.poster,
                Some(format!("https://posters.example/{}.jpg", n))
            );
            assert_eq!(doc.metadata.year, Some((1990 + n).to_string()));
        }
    }

    #[tokio::test]
    async fn test_upload_failure_propagates() {
        let lines = rows(2);
        let file = write_dataset(&lines.iter().map(String::as_str).collect::<Vec<_>>());

        let err = ingest_documents(&config(file.path(), 10), &FailingStore, &FakeEmbedder::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CinedexError::VectorStore(_)));
    }

    #[tokio::test]
    async fn test_repeated_runs_are_additive() {
        let lines = rows(2);
        let file = write_dataset(&lines.iter().map(String::as_str).collect::<Vec<_>>());
        let store = MemoryVectorStore::new();
        let embedder = FakeEmbedder::default();
        let config = config(file.path(), 10);

        ingest_documents(&config, &store, &embedder).await.unwrap();
        ingest_documents(&config, &store, &embedder).await.unwrap();

        assert_eq!(store.document_count("movies").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_missing_dataset_is_config_error() {
        let store = MemoryVectorStore::new();
        let embedder = FakeEmbedder::default();
        let config = config(std::path::Path::new("/no/such/movies.csv"), 10);

        let err = ingest_documents(&config, &store, &embedder).await.unwrap_err();

        assert!(matches!(err, CinedexError::Config(_)));
        assert_eq!(embedder.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_config() {
        let file = write_dataset(&[]);
        let store = MemoryVectorStore::new();
        let embedder = FakeEmbedder::default();

        let mut bad = config(file.path(), 0);
        assert!(ingest_documents(&bad, &store, &embedder).await.is_err());

        bad.batch_limit = 1;
        bad.collection = " ".to_string();
        assert!(ingest_documents(&bad, &store, &embedder).await.is_err());
    }

    #[test]
    fn test_apply_batch_limit() {
        let docs = build_documents(&vec![SourceRecord::default(); 4]);

        assert_eq!(apply_batch_limit(docs.clone(), 2).len(), 2);
        assert_eq!(apply_batch_limit(docs.clone(), 4).len(), 4);
        assert_eq!(apply_batch_limit(docs, 100).len(), 4);
    }
}
