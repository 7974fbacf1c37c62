//! Qdrant vector store over the REST API.
//!
//! Points carry the document as payload (`page_content` plus `metadata`), so
//! collections stay readable by other Qdrant clients that use that layout.

use super::{embed_documents, SearchResult, VectorStore};
use crate::document::RetrievalDocument;
use crate::embedding::Embedder;
use crate::error::{CinedexError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;
use uuid::Uuid;

/// Points per upsert request unless configured otherwise.
pub const DEFAULT_UPLOAD_BATCH_SIZE: usize = 64;

/// Qdrant REST client bound to one endpoint.
pub struct QdrantStore {
    client: reqwest::Client,
    base: Url,
    upload_batch_size: usize,
}

impl QdrantStore {
    /// Build a client for `endpoint`, sending `api_key` in the `api-key` header when set.
    pub fn new(endpoint: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let base = Url::parse(endpoint.trim())?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(CinedexError::Config(format!(
                "Vector store URL must be an http(s) URL: {}",
                endpoint
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| CinedexError::Config(format!("Invalid vector store API key: {}", e)))?;
            headers.insert("api-key", value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base,
            upload_batch_size: DEFAULT_UPLOAD_BATCH_SIZE,
        })
    }

    /// Override the number of points sent per upsert request.
    pub fn with_upload_batch_size(mut self, size: usize) -> Self {
        self.upload_batch_size = size.max(1);
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| CinedexError::Config(format!("Invalid vector store URL: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Create the collection with cosine distance unless it already exists.
    #[instrument(skip(self))]
    pub async fn ensure_collection(&self, collection: &str, size: usize) -> Result<()> {
        let url = self.endpoint(&["collections", collection])?;

        let response = self.client.get(url.clone()).send().await?;
        if response.status().is_success() {
            debug!("Collection {} already exists", collection);
            return Ok(());
        }
        if response.status() != StatusCode::NOT_FOUND {
            check(response, "Collection lookup").await?;
        }

        let request = CreateCollection {
            vectors: VectorParams {
                size,
                distance: "Cosine",
            },
        };
        let response = self.client.put(url).json(&request).send().await?;
        check(response, "Collection creation").await?;

        info!("Created collection {} ({} dimensions)", collection, size);
        Ok(())
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    #[instrument(skip(self, docs, embedder), fields(count = docs.len()))]
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
        let size = embeddings.first().map_or(embedder.dimensions(), Vec::len);
        self.ensure_collection(collection, size).await?;

        let mut url = self.endpoint(&["collections", collection, "points"])?;
        url.query_pairs_mut().append_pair("wait", "true");

        for (batch_docs, batch_vectors) in docs
            .chunks(self.upload_batch_size)
            .zip(embeddings.chunks(self.upload_batch_size))
        {
            let request = UpsertPoints {
                points: batch_docs
                    .iter()
                    .zip(batch_vectors)
                    .map(|(doc, vector)| Point {
                        id: Uuid::new_v4(),
                        vector,
                        payload: doc,
                    })
                    .collect(),
            };

            let response = self.client.put(url.clone()).json(&request).send().await?;
            check(response, "Point upsert").await?;
            debug!("Uploaded {} points to {}", batch_docs.len(), collection);
        }

        info!("Uploaded {} documents to {}", docs.len(), collection);
        Ok(docs.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let url = self.endpoint(&["collections", collection, "points", "search"])?;
        let request = SearchRequest {
            vector: query_embedding,
            limit,
            with_payload: true,
        };

        let response = self.client.post(url).json(&request).send().await?;
        let body: QdrantResponse<Vec<ScoredPoint>> =
            check(response, "Search").await?.json().await?;

        let results: Vec<SearchResult> = body
            .result
            .into_iter()
            .filter_map(|point| {
                point.payload.map(|document| SearchResult {
                    document,
                    score: point.score,
                })
            })
            .collect();

        debug!("Found {} matching documents", results.len());
        Ok(results)
    }

    async fn document_count(&self, collection: &str) -> Result<usize> {
        let url = self.endpoint(&["collections", collection, "points", "count"])?;
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "exact": true }))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(0);
        }
        let body: QdrantResponse<CountResult> = check(response, "Count").await?.json().await?;
        Ok(body.result.count)
    }
}

/// Turn a non-success response into a vector store error carrying the body.
async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    Err(CinedexError::VectorStore(format!(
        "{} failed ({}): {}",
        action, status, body
    )))
}

#[derive(Serialize)]
struct CreateCollection {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Serialize)]
struct UpsertPoints<'a> {
    points: Vec<Point<'a>>,
}

#[derive(Serialize)]
struct Point<'a> {
    id: Uuid,
    vector: &'a [f32],
    payload: &'a RetrievalDocument,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: Option<RetrievalDocument>,
}

#[derive(Deserialize)]
struct CountResult {
    count: usize,
}
