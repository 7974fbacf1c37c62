//! Configuration settings for cinedex.

use crate::catalog::CatalogConfig;
use crate::error::{CinedexError, Result};
use crate::ingest::{IngestConfig, DEFAULT_BATCH_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the vector service endpoint.
pub const QDRANT_URL_ENV: &str = "QDRANT_URL";
/// Environment variable holding the vector service credential.
pub const QDRANT_API_KEY_ENV: &str = "QDRANT_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub dataset: DatasetSettings,
    pub catalog: CatalogSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
}

/// Source dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Path to the movie CSV file.
    pub path: String,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: "data/imdb_top_1000_cleaned.csv".to_string(),
        }
    }
}

/// Relational catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Path to the SQLite database holding the `movies` table.
    pub sqlite_path: String,
    /// Number of rows shown by `cinedex stats`.
    pub sample_size: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            sqlite_path: "movies.db".to_string(),
            sample_size: 5,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Qdrant endpoint, e.g. `https://<cluster>.cloud.qdrant.io`.
    pub url: Option<String>,
    /// Qdrant API key.
    pub api_key: Option<String>,
    /// Collection the retrieval documents are loaded into.
    pub collection: String,
    /// Maximum number of documents uploaded per ingest run.
    pub batch_limit: usize,
    /// Points per upsert request.
    pub upload_batch_size: usize,
    /// HTTP timeout for vector service requests.
    pub timeout_secs: u64,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            collection: "movies".to_string(),
            batch_limit: DEFAULT_BATCH_LIMIT,
            upload_batch_size: 64,
            timeout_secs: 60,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// `QDRANT_URL` and `QDRANT_API_KEY` override whatever the file says.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(QDRANT_URL_ENV) {
            self.vector_store.url = Some(url);
        }
        if let Some(key) = non_empty(QDRANT_API_KEY_ENV) {
            self.vector_store.api_key = Some(key);
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CinedexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cinedex")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded dataset path.
    pub fn dataset_path(&self) -> PathBuf {
        Self::expand_path(&self.dataset.path)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.catalog.sqlite_path)
    }

    /// Vector service endpoint, or a configuration error when unset.
    pub fn qdrant_url(&self) -> Result<&str> {
        self.vector_store
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                CinedexError::Config(format!(
                    "Vector store URL not set. Set [vector_store] url or export {}",
                    QDRANT_URL_ENV
                ))
            })
    }

    /// Configuration for the relational loader.
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            dataset_path: self.dataset_path(),
            store_path: self.sqlite_path(),
        }
    }

    /// Configuration for the retrieval document builder.
    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            dataset_path: self.dataset_path(),
            collection: self.vector_store.collection.clone(),
            batch_limit: self.vector_store.batch_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [vector_store]
            collection = "films"
            "#,
        )
        .unwrap();

        assert_eq!(settings.vector_store.collection, "films");
        assert_eq!(settings.vector_store.batch_limit, DEFAULT_BATCH_LIMIT);
        assert_eq!(settings.catalog.sqlite_path, "movies.db");
        assert_eq!(settings.embedding.dimensions, 1536);
    }

    #[test]
    fn test_env_overrides_vector_store() {
        let mut settings = Settings::default();
        settings.vector_store.url = Some("http://from-file:6333".to_string());

        settings.apply_env(|key| match key {
            QDRANT_URL_ENV => Some("https://cloud.example:6333".to_string()),
            QDRANT_API_KEY_ENV => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(settings.qdrant_url().unwrap(), "https://cloud.example:6333");
        assert!(settings.vector_store.api_key.is_none());
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let settings = Settings::default();
        assert!(matches!(settings.qdrant_url(), Err(CinedexError::Config(_))));
    }

    #[test]
    fn test_pipeline_configs() {
        let mut settings = Settings::default();
        settings.dataset.path = "/data/movies.csv".to_string();
        settings.catalog.sqlite_path = "/data/movies.db".to_string();
        settings.vector_store.batch_limit = 10;

        let catalog = settings.catalog_config();
        assert_eq!(catalog.dataset_path, PathBuf::from("/data/movies.csv"));
        assert_eq!(catalog.store_path, PathBuf::from("/data/movies.db"));

        let ingest = settings.ingest_config();
        assert_eq!(ingest.collection, "movies");
        assert_eq!(ingest.batch_limit, 10);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.vector_store.collection = "saved".to_string();
        settings.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let reloaded: Settings = toml::from_str(&content).unwrap();
        assert_eq!(reloaded.vector_store.collection, "saved");
    }
}
