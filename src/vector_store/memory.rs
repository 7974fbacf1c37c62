//! In-memory vector store implementation.
//!
//! Useful for testing.

use super::{cosine_similarity, embed_documents, SearchResult, VectorStore};
use crate::document::RetrievalDocument;
use crate::embedding::Embedder;
use crate::error::{CinedexError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

struct StoredDocument {
    document: RetrievalDocument,
    embedding: Vec<f32>,
}

/// In-memory vector store keyed by collection name.
pub struct MemoryVectorStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Documents of a collection in insertion order.
    pub fn documents(&self, collection: &str) -> Result<Vec<RetrievalDocument>> {
        let collections = self.collections.read().map_err(lock_error)?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().map(|d| d.document.clone()).collect())
            .unwrap_or_default())
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> CinedexError {
    CinedexError::VectorStore(format!("Failed to acquire lock: {}", e))
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn add_documents(
        &self,
        collection: &str,
        docs: &[RetrievalDocument],
        embedder: &dyn Embedder,
    ) -> Result<usize> {
        if docs.is_empty() {
            return Ok(0);
        }

        let embeddings = embed_documents(docs, embedder).await?;

        let mut collections = self.collections.write().map_err(lock_error)?;
        let stored = collections.entry(collection.to_string()).or_default();
        stored.extend(
            docs.iter()
                .cloned()
                .zip(embeddings)
                .map(|(document, embedding)| StoredDocument { document, embedding }),
        );

        Ok(docs.len())
    }

    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().map_err(lock_error)?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<SearchResult> = docs
            .iter()
            .map(|doc| SearchResult {
                document: doc.document.clone(),
                score: cosine_similarity(query_embedding, &doc.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn document_count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().map_err(lock_error)?;
        Ok(collections.get(collection).map_or(0, Vec::len))
    }
}
