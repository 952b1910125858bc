use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field map of a stored document, as the remote store sees it.
pub type Document = serde_json::Map<String, Value>;

/// Stored field names of a movie document.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const STATUS: &str = "status";
    pub const RATING: &str = "rating";
    pub const REVIEW: &str = "review";
    pub const POSTER_URL: &str = "posterUrl";
    pub const IMDB_ID: &str = "imdbId";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";

    // user profile document
    pub const DISPLAY_NAME: &str = "displayName";
    pub const EMAIL: &str = "email";
}

/// One field write inside a partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Set(Value),
    /// Delete the key from the document rather than writing null.
    Remove,
}

/// Ordered set of field writes applied atomically by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPatch {
    fields: Vec<(String, FieldValue)>,
}

impl DocumentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.push(name, FieldValue::Set(value.into()));
        self
    }

    pub fn remove(mut self, name: &str) -> Self {
        self.push(name, FieldValue::Remove);
        self
    }

    fn push(&mut self, name: &str, value: FieldValue) {
        // last write for a field wins
        self.fields.retain(|(existing, _)| existing != name);
        self.fields.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Apply every write to `doc`, removing keys tagged `Remove`.
    pub fn apply_to(&self, doc: &mut Document) {
        for (name, value) in &self.fields {
            match value {
                FieldValue::Set(v) => {
                    doc.insert(name.clone(), v.clone());
                }
                FieldValue::Remove => {
                    doc.remove(name);
                }
            }
        }
    }
}
