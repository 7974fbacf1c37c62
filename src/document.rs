//! Retrieval documents built from dataset rows.

use crate::dataset::SourceRecord;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Display metadata carried alongside each embedded document.
///
/// Values are copied verbatim from the row, without trimming or parsing.
/// Collections written by other clients may hold numbers here; those read
/// back as their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, deserialize_with = "verbatim")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "verbatim")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "verbatim")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "verbatim")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "verbatim")]
    pub poster: Option<String>,
}

fn verbatim<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Embeddable text plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalDocument {
    /// Text sent to the embedding model.
    pub page_content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl RetrievalDocument {
    /// Project a dataset row into a document. Missing fields render empty.
    pub fn from_record(record: &SourceRecord) -> Self {
        Self {
            page_content: page_content(
                record.series_title.as_deref().unwrap_or_default(),
                record.overview.as_deref().unwrap_or_default(),
                record.genre.as_deref().unwrap_or_default(),
            ),
            metadata: DocumentMetadata {
                title: record.series_title.clone(),
                year: record.released_year.clone(),
                rating: record.imdb_rating.clone(),
                genre: record.genre.clone(),
                poster: record.poster_link.clone(),
            },
        }
    }
}

impl From<&SourceRecord> for RetrievalDocument {
    fn from(record: &SourceRecord) -> Self {
        Self::from_record(record)
    }
}

// The indentation is part of the embedded text; existing collections were built with it.
fn page_content(title: &str, overview: &str, genre: &str) -> String {
    format!(
        "\n    Title: {}\n    Overview: {}\n    Genre: {}\n    ",
        title, overview, genre
    )
}
