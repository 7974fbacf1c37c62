//! cinedex - movie catalog and retrieval loader
//!
//! Turns the IMDb Top 1000 movie dataset into the two stores a movie
//! recommendation assistant reads from: a flat SQLite `movies` table for
//! SQL questions, and a Qdrant collection of synopsis documents for
//! semantic retrieval.
//!
//! # Architecture
//!
//! - `config` - Settings file and the per-pipeline configurations
//! - `dataset` - CSV reader producing raw source records
//! - `coerce` - Null-on-failure conversion of raw cells to typed values
//! - `catalog` - Relational loader and the SQLite catalog store
//! - `document` - Retrieval documents (embedding text plus metadata)
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction (Qdrant, in-memory)
//! - `ingest` - Retrieval document builder
//!
//! # Example
//!
//! ```rust,no_run
//! use cinedex::catalog::load_catalog;
//! use cinedex::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let report = load_catalog(&settings.catalog_config())?;
//!     println!("Imported {} movies ({} skipped)", report.imported, report.failed);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod coerce;
pub mod config;
pub mod dataset;
pub mod document;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod openai;
pub mod vector_store;

pub use error::{CinedexError, Result};
