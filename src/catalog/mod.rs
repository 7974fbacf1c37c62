//! Relational movie catalog.
//!
//! Turns the dataset into the flat `movies` table that the SQL agent queries.
//! Each load replaces the table contents in a single transaction.

mod sqlite;

pub use sqlite::{CatalogStore, CatalogSummary};

use crate::coerce;
use crate::dataset::{Dataset, SourceRecord};
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Explicit inputs of the relational loader.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// CSV file to read.
    pub dataset_path: PathBuf,
    /// SQLite database file holding the `movies` table.
    pub store_path: PathBuf,
}

/// A typed row of the `movies` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Assigned by the store; `None` until the row is inserted.
    pub id: Option<i64>,
    pub poster_link: Option<String>,
    pub title: Option<String>,
    pub released_year: Option<i64>,
    pub certificate: Option<String>,
    pub runtime: Option<i64>,
    pub genre: Option<String>,
    pub imdb_rating: Option<f64>,
    pub overview: Option<String>,
    pub meta_score: Option<f64>,
    pub director: Option<String>,
    pub star1: Option<String>,
    pub star2: Option<String>,
    pub star3: Option<String>,
    pub star4: Option<String>,
    pub no_of_votes: Option<i64>,
    pub gross: Option<f64>,
}

impl From<&SourceRecord> for CatalogEntry {
    fn from(record: &SourceRecord) -> Self {
        Self {
            id: None,
            poster_link: coerce::text(record.poster_link.as_deref()),
            title: coerce::text(record.series_title.as_deref()),
            released_year: coerce::integer(record.released_year.as_deref()),
            certificate: coerce::text(record.certificate.as_deref()),
            runtime: coerce::integer(record.runtime.as_deref()),
            genre: coerce::text(record.genre.as_deref()),
            imdb_rating: coerce::real(record.imdb_rating.as_deref()),
            overview: coerce::text(record.overview.as_deref()),
            meta_score: coerce::real(record.meta_score.as_deref()),
            director: coerce::text(record.director.as_deref()),
            star1: coerce::text(record.star1.as_deref()),
            star2: coerce::text(record.star2.as_deref()),
            star3: coerce::text(record.star3.as_deref()),
            star4: coerce::text(record.star4.as_deref()),
            no_of_votes: coerce::integer(record.no_of_votes.as_deref()),
            gross: coerce::real(record.gross.as_deref()),
        }
    }
}

/// A dataset row that did not make it into the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    /// Line the row started on, when known.
    pub line: Option<u64>,
    /// Row title, or the `Unknown` placeholder.
    pub title: String,
    pub reason: String,
}

/// Outcome of a catalog load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Rows inserted.
    pub imported: usize,
    /// Rows skipped.
    pub failed: usize,
    /// Details for every skipped row, in file order.
    pub failures: Vec<RowFailure>,
}

/// Load the dataset into the catalog, replacing whatever the table held.
///
/// A missing or unreadable dataset fails before the store is opened, so no
/// database file is created.
#[instrument(skip_all, fields(dataset = %config.dataset_path.display()))]
pub fn load_catalog(config: &CatalogConfig) -> Result<LoadReport> {
    let dataset = Dataset::open(&config.dataset_path)?;
    let rows = dataset.rows()?;

    info!(
        "Importing {} into {}",
        config.dataset_path.display(),
        config.store_path.display()
    );

    let mut store = CatalogStore::open(&config.store_path)?;
    store.replace_all(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_record() {
        let record = SourceRecord {
            poster_link: Some("https://m.media-amazon.com/p.jpg".to_string()),
            series_title: Some(" Inception ".to_string()),
            released_year: Some("2010".to_string()),
            runtime: Some("148".to_string()),
            imdb_rating: Some("8.8".to_string()),
            meta_score: Some("N/A".to_string()),
            no_of_votes: Some("2067042.0".to_string()),
            gross: Some("292576195".to_string()),
            ..Default::default()
        };

        let entry = CatalogEntry::from(&record);

        assert_eq!(entry.id, None);
        assert_eq!(entry.title.as_deref(), Some("Inception"));
        assert_eq!(entry.released_year, Some(2010));
        assert_eq!(entry.runtime, Some(148));
        assert_eq!(entry.imdb_rating, Some(8.8));
        assert_eq!(entry.meta_score, None);
        assert_eq!(entry.no_of_votes, Some(2067042));
        assert_eq!(entry.gross, Some(292576195.0));
        assert_eq!(entry.director, None);
    }

    #[test]
    fn test_missing_dataset_creates_no_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            dataset_path: dir.path().join("missing.csv"),
            store_path: dir.path().join("movies.db"),
        };

        let err = load_catalog(&config).unwrap_err();

        assert!(matches!(err, crate::error::CinedexError::Config(_)));
        assert!(!config.store_path.exists());
    }

    #[test]
    fn test_unreadable_header_creates_no_store() {
        let dir = tempfile::tempdir().unwrap();
        let dataset_path = dir.path().join("movies.csv");
        std::fs::write(&dataset_path, b"Poster_Link,Series_\xff\xfeTitle\nhttp://p/1.jpg,Heat\n").unwrap();
        let config = CatalogConfig {
            dataset_path,
            store_path: dir.path().join("movies.db"),
        };

        let err = load_catalog(&config).unwrap_err();

        assert!(matches!(err, crate::error::CinedexError::Csv(_)));
        assert!(!config.store_path.exists());
    }

    #[test]
    fn test_load_catalog_from_file() {
        let file = crate::dataset::tests::write_dataset(&[
            "http://p/1.jpg,The Shawshank Redemption,1994,A,142,Drama,9.3,Two imprisoned men bond.,80,Frank Darabont,Tim Robbins,Morgan Freeman,Bob Gunton,William Sadler,2343110,28341469",
            "http://p/2.jpg,,1972,A,175,Crime,9.2,No title here.,100,Francis Ford Coppola,Marlon Brando,Al Pacino,James Caan,Diane Keaton,1620367,134966411",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            dataset_path: file.path().to_path_buf(),
            store_path: dir.path().join("db").join("movies.db"),
        };

        let report = load_catalog(&config).unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].title, "Unknown");
        assert_eq!(report.failures[0].line, Some(3));

        let store = CatalogStore::open(&config.store_path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
