//! SQLite-backed catalog store.

use super::{CatalogEntry, LoadReport, RowFailure};
use crate::dataset::{RowReadError, SourceRow, UNKNOWN_TITLE};
use crate::error::Result;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Log a progress line every this many inserted rows.
const PROGRESS_INTERVAL: usize = 100;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS movies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        poster_link TEXT,
        title TEXT NOT NULL,
        released_year INTEGER,
        certificate TEXT,
        runtime INTEGER,
        genre TEXT,
        imdb_rating REAL,
        overview TEXT,
        meta_score REAL,
        director TEXT,
        star1 TEXT,
        star2 TEXT,
        star3 TEXT,
        star4 TEXT,
        no_of_votes INTEGER,
        gross REAL
    );
"#;

const INSERT_MOVIE: &str = r#"
    INSERT INTO movies (
        poster_link, title, released_year, certificate,
        runtime, genre, imdb_rating, overview, meta_score,
        director, star1, star2, star3, star4,
        no_of_votes, gross
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
"#;

const SELECT_MOVIES: &str = r#"
    SELECT id, poster_link, title, released_year, certificate,
           runtime, genre, imdb_rating, overview, meta_score,
           director, star1, star2, star3, star4,
           no_of_votes, gross
    FROM movies
"#;

/// Snapshot of the catalog for reporting.
#[derive(Debug, Clone)]
pub struct CatalogSummary {
    /// Rows in the table.
    pub total: usize,
    /// Mean IMDb rating over rows that have one.
    pub average_rating: Option<f64>,
    /// First rows by id.
    pub sample: Vec<CatalogEntry>,
}

/// The `movies` table.
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Open (or create) the catalog database and ensure the schema exists.
    #[instrument(skip_all)]
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        info!("Opened movie catalog at {:?}", path);

        Ok(Self { conn })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Replace the table contents with `rows`.
    ///
    /// Delete and inserts share one transaction committed at the end, so the
    /// table either keeps its previous rows or holds only the new ones. Rows
    /// that fail to read or insert are counted and skipped.
    #[instrument(skip_all)]
    pub fn replace_all<I>(&mut self, rows: I) -> Result<LoadReport>
    where
        I: IntoIterator<Item = std::result::Result<SourceRow, RowReadError>>,
    {
        let tx = self.conn.transaction()?;

        let cleared = tx.execute("DELETE FROM movies", [])?;
        info!("Cleared {} existing movies", cleared);

        let mut report = LoadReport::default();
        {
            let mut stmt = tx.prepare(INSERT_MOVIE)?;

            for row in rows {
                let row = match row {
                    Ok(row) => row,
                    Err(e) => {
                        warn!("Error reading movie '{}': {}", UNKNOWN_TITLE, e);
                        report.failed += 1;
                        report.failures.push(RowFailure {
                            line: e.line,
                            title: UNKNOWN_TITLE.to_string(),
                            reason: e.source.to_string(),
                        });
                        continue;
                    }
                };

                let entry = CatalogEntry::from(&row.record);
                let inserted = stmt.execute(params![
                    entry.poster_link,
                    entry.title,
                    entry.released_year,
                    entry.certificate,
                    entry.runtime,
                    entry.genre,
                    entry.imdb_rating,
                    entry.overview,
                    entry.meta_score,
                    entry.director,
                    entry.star1,
                    entry.star2,
                    entry.star3,
                    entry.star4,
                    entry.no_of_votes,
                    entry.gross,
                ]);

                match inserted {
                    Ok(_) => {
                        report.imported += 1;
                        if report.imported % PROGRESS_INTERVAL == 0 {
                            info!("Imported {} movies...", report.imported);
                        }
                    }
                    Err(e) => {
                        let title = row.record.display_title();
                        warn!("Error importing movie '{}': {}", title, e);
                        report.failed += 1;
                        report.failures.push(RowFailure {
                            line: Some(row.line),
                            title: title.to_string(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        tx.commit()?;
        info!(
            "Catalog load complete: {} imported, {} failed",
            report.imported, report.failed
        );
        Ok(report)
    }

    /// Number of rows in the table.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// First `limit` rows by id.
    pub fn sample(&self, limit: usize) -> Result<Vec<CatalogEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY id LIMIT ?1", SELECT_MOVIES))?;

        let rows = stmt.query_map(params![limit as i64], entry_from_row)?;
        let entries = rows.collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Fetched {} catalog rows", entries.len());
        Ok(entries)
    }

    /// Mean IMDb rating, ignoring rows without one.
    pub fn average_rating(&self) -> Result<Option<f64>> {
        let avg = self.conn.query_row(
            "SELECT AVG(imdb_rating) FROM movies WHERE imdb_rating IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(avg)
    }

    /// Row count, average rating and a sample of `limit` rows.
    pub fn summary(&self, limit: usize) -> Result<CatalogSummary> {
        Ok(CatalogSummary {
            total: self.count()?,
            average_rating: self.average_rating()?,
            sample: self.sample(limit)?,
        })
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    Ok(CatalogEntry {
        id: row.get(0)?,
        poster_link: row.get(1)?,
        title: row.get(2)?,
        released_year: row.get(3)?,
        certificate: row.get(4)?,
        runtime: row.get(5)?,
        genre: row.get(6)?,
        imdb_rating: row.get(7)?,
        overview: row.get(8)?,
        meta_score: row.get(9)?,
        director: row.get(10)?,
        star1: row.get(11)?,
        star2: row.get(12)?,
        star3: row.get(13)?,
        star4: row.get(14)?,
        no_of_votes: row.get(15)?,
        gross: row.get(16)?,
    })
}
