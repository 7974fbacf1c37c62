//! Vector store abstraction for cinedex.
//!
//! Provides a trait-based interface over the vector database holding the
//! retrieval collection.

mod memory;
mod qdrant;

pub use memory::MemoryVectorStore;
pub use qdrant::QdrantStore;

use crate::document::RetrievalDocument;
use crate::embedding::Embedder;
use crate::error::{CinedexError, Result};
use async_trait::async_trait;

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: RetrievalDocument,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and add documents to a collection, creating it if needed.
    ///
    /// Documents are always added; nothing already in the collection is
    /// replaced or deduplicated. Returns the number of documents stored.
    async fn add_documents(
        &self,
        collection: &str,
        docs: &[RetrievalDocument],
        embedder: &dyn Embedder,
    ) -> Result<usize>;

    /// Return the `limit` documents nearest to `query_embedding`.
    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Number of documents in a collection (0 if it does not exist).
    async fn document_count(&self, collection: &str) -> Result<usize>;
}

/// Embed the page content of `docs`, checking one vector comes back per document.
pub async fn embed_documents(
    docs: &[RetrievalDocument],
    embedder: &dyn Embedder,
) -> Result<Vec<Vec<f32>>> {
    let texts: Vec<String> = docs.iter().map(|d| d.page_content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;

    if embeddings.len() != docs.len() {
        return Err(CinedexError::Embedding(format!(
            "Expected {} embeddings, got {}",
            docs.len(),
            embeddings.len()
        )));
    }
    Ok(embeddings)
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic embedder: a small bag-of-letters vector per text.
    #[derive(Default)]
    pub(crate) struct FakeEmbedder {
        pub calls: AtomicUsize,
    }

    pub(crate) fn letter_vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; 8];
        for c in text.to_lowercase().chars().filter(|c| c.is_ascii_alphabetic()) {
            v[(c as usize - 'a' as usize) % 8] += 1.0;
        }
        v
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(letter_vector(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| letter_vector(t)).collect())
        }

        fn dimensions(&self) -> usize {
            8
        }
    }

    /// Embedder that drops the last vector of every batch.
    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().skip(1).map(|_| vec![1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_embed_documents_checks_count() {
        let docs = vec![
            RetrievalDocument::from_record(&Default::default()),
            RetrievalDocument::from_record(&Default::default()),
        ];

        let ok = embed_documents(&docs, &FakeEmbedder::default()).await.unwrap();
        assert_eq!(ok.len(), 2);

        let err = embed_documents(&docs, &ShortEmbedder).await.unwrap_err();
        assert!(matches!(err, CinedexError::Embedding(_)));
    }
}
