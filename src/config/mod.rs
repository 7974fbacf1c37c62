//! Configuration module for cinedex.
//!
//! Handles loading application settings and turning them into the explicit
//! per-pipeline configurations the loaders take.

mod settings;

pub use settings::{
    CatalogSettings, DatasetSettings, EmbeddingSettings, Settings, VectorStoreSettings,
};
