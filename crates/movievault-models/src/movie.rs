use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use crate::document::Document;
use crate::error::RecordError;
use crate::rating::Rating;
use crate::status::MovieStatus;

/// Store-assigned document id, stable for the lifetime of the record
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A persisted watchlist entry as delivered in a snapshot.
///
/// Timestamps are Unix milliseconds. `rating` and `review` are absent rather
/// than zero/empty when the user has not provided them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    #[serde(skip)]
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub status: MovieStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MovieRecord {
    /// Decode a stored document and check the record invariants.
    pub fn from_document(id: MovieId, doc: &Document) -> Result<Self, RecordError> {
        let mut record: MovieRecord = serde_json::from_value(Value::Object(doc.clone()))?;
        record.id = id;

        if record.title.trim().is_empty() {
            return Err(RecordError::BlankTitle);
        }
        if record.review.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(RecordError::BlankReview);
        }
        if record.updated_at < record.created_at {
            return Err(RecordError::TimestampOrder {
                created_at: record.created_at,
                updated_at: record.updated_at,
            });
        }
        Ok(record)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at).single()
    }

    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.updated_at).single()
    }
}
