//! Movie dataset reader.
//!
//! The dataset is the IMDb Top 1000 CSV. Column names are matched literally,
//! so a renamed header leaves the corresponding field absent on every row.

use crate::error::{CinedexError, Result};
use csv::StringRecord;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Header fields the loaders key off.
pub const COLUMNS: [&str; 16] = [
    "Poster_Link",
    "Series_Title",
    "Released_Year",
    "Certificate",
    "Runtime",
    "Genre",
    "IMDB_Rating",
    "Overview",
    "Meta_score",
    "Director",
    "Star1",
    "Star2",
    "Star3",
    "Star4",
    "No_of_Votes",
    "Gross",
];

/// One raw row of the dataset. Values are exactly as read; empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SourceRecord {
    #[serde(rename = "Poster_Link")]
    pub poster_link: Option<String>,
    #[serde(rename = "Series_Title")]
    pub series_title: Option<String>,
    #[serde(rename = "Released_Year")]
    pub released_year: Option<String>,
    #[serde(rename = "Certificate")]
    pub certificate: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "IMDB_Rating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Overview")]
    pub overview: Option<String>,
    #[serde(rename = "Meta_score")]
    pub meta_score: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Star1")]
    pub star1: Option<String>,
    #[serde(rename = "Star2")]
    pub star2: Option<String>,
    #[serde(rename = "Star3")]
    pub star3: Option<String>,
    #[serde(rename = "Star4")]
    pub star4: Option<String>,
    #[serde(rename = "No_of_Votes")]
    pub no_of_votes: Option<String>,
    #[serde(rename = "Gross")]
    pub gross: Option<String>,
}

impl SourceRecord {
    /// Title used in log lines, with a placeholder when the row has none.
    pub fn display_title(&self) -> &str {
        self.series_title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }
}

/// Placeholder reported for rows whose title is unavailable.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// A parsed row together with the line it started on.
#[derive(Debug, Clone)]
pub struct SourceRow {
    /// 1-based line number in the file (the header is line 1).
    pub line: u64,
    pub record: SourceRecord,
}

/// A row that could not be read from the file.
#[derive(Debug)]
pub struct RowReadError {
    pub line: Option<u64>,
    pub source: csv::Error,
}

impl std::fmt::Display for RowReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.source),
            None => write!(f, "{}", self.source),
        }
    }
}

/// Handle to a dataset file that is known to exist.
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
}

impl Dataset {
    /// Open a dataset, failing with a configuration error if the file is missing.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CinedexError::Config(format!(
                "Dataset file not found at {}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate rows in file order.
    ///
    /// Rows that fail to parse are yielded as errors; iteration continues after them.
    pub fn rows(&self) -> Result<DatasetRows> {
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let missing = missing_columns(&headers);
        if !missing.is_empty() {
            warn!(
                "Dataset {} is missing columns: {}",
                self.path.display(),
                missing.join(", ")
            );
        }
        debug!("Reading dataset {} ({} columns)", self.path.display(), headers.len());

        Ok(DatasetRows {
            records: reader.into_records(),
            headers,
        })
    }

    /// Read every row, failing on the first one that cannot be parsed.
    pub fn read_all(&self) -> Result<Vec<SourceRecord>> {
        self.rows()?
            .map(|row| {
                row.map(|r| r.record)
                    .map_err(|e| CinedexError::Dataset(e.to_string()))
            })
            .collect()
    }
}

/// Iterator over the rows of a [`Dataset`].
pub struct DatasetRows {
    records: csv::StringRecordsIntoIter<File>,
    headers: StringRecord,
}

impl Iterator for DatasetRows {
    type Item = std::result::Result<SourceRow, RowReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line());
                return Some(Err(RowReadError { line, source: e }));
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or_default();
        Some(
            record
                .deserialize::<SourceRecord>(Some(&self.headers))
                .map(|record| SourceRow { line, record })
                .map_err(|source| RowReadError {
                    line: Some(line),
                    source,
                }),
        )
    }
}

/// Expected columns absent from the header row.
pub fn missing_columns(headers: &StringRecord) -> Vec<&'static str> {
    COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const HEADER: &str = "Poster_Link,Series_Title,Released_Year,Certificate,Runtime,Genre,IMDB_Rating,Overview,Meta_score,Director,Star1,Star2,Star3,Star4,No_of_Votes,Gross";

    /// Write a CSV fixture with the standard header followed by `rows`.
    pub(crate) fn write_dataset(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_open_missing_file() {
        let err = Dataset::open(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, CinedexError::Config(_)));
    }

    #[test]
    fn test_rows_in_file_order() {
        let file = write_dataset(&[
            "http://p/1.jpg,The Godfather,1972,A,175,\"Crime, Drama\",9.2,\"An organized crime dynasty's aging patriarch.\",100,Francis Ford Coppola,Marlon Brando,Al Pacino,James Caan,Diane Keaton,1620367,134966411",
            "http://p/2.jpg,Parasite,2019,A,132,\"Comedy, Drama, Thriller\",8.6,Greed and class discrimination.,96,Bong Joon Ho,Kang-ho Song,Lee Sun-kyun,Cho Yeo-jeong,Choi Woo-sik,552778,53367844",
        ]);

        let dataset = Dataset::open(file.path()).unwrap();
        let rows: Vec<SourceRow> = dataset.rows().unwrap().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].record.series_title.as_deref(), Some("The Godfather"));
        assert_eq!(rows[0].record.genre.as_deref(), Some("Crime, Drama"));
        assert_eq!(rows[1].record.director.as_deref(), Some("Bong Joon Ho"));
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_empty_and_short_rows() {
        let file = write_dataset(&["http://p/3.jpg,Short Row,,U", ",,,,,,,,,,,,,,,"]);

        let dataset = Dataset::open(file.path()).unwrap();
        let records = dataset.read_all().unwrap();

        assert_eq!(records[0].series_title.as_deref(), Some("Short Row"));
        assert_eq!(records[0].released_year, None);
        assert_eq!(records[0].certificate.as_deref(), Some("U"));
        assert_eq!(records[0].gross, None);
        assert_eq!(records[1], SourceRecord::default());
        assert_eq!(records[1].display_title(), UNKNOWN_TITLE);
    }

    #[test]
    fn test_missing_columns() {
        let headers = StringRecord::from(vec!["Series_Title", "Overview", "Extra"]);
        let missing = missing_columns(&headers);
        assert_eq!(missing.len(), COLUMNS.len() - 2);
        assert!(missing.contains(&"Poster_Link"));
        assert!(!missing.contains(&"Overview"));
    }
}
