//! Normalizes raw search responses into [`SearchCandidate`]s.
//!
//! The wire format is OMDb's: a top-level `"Response"` flag (`"True"`/`"False"`),
//! a `"Search"` array of items keyed `Title`, `Year`, `imdbID`, `Poster`, and on
//! failure an `"Error"` message. A `"False"` response is reported as an empty
//! list whatever the reason, so "no matches" and "service reported failure"
//! look the same to callers.
//!
//! Id lookups return one flat record with the same keys plus detail fields.

use movievault_models::SearchCandidate;
use serde_json::Value;
use tracing::{debug, warn};

const RESPONSE: &str = "Response";
const RESULTS: &str = "Search";
const ERROR: &str = "Error";
const TITLE: &str = "Title";
const YEAR: &str = "Year";
const IMDB_ID: &str = "imdbID";
const POSTER: &str = "Poster";
const RUNTIME: &str = "Runtime";
const GENRE: &str = "Genre";
const DIRECTOR: &str = "Director";
const PLOT: &str = "Plot";

/// OMDb's placeholder for a missing value
const NOT_AVAILABLE: &str = "N/A";

/// Result of mapping one search response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub candidates: Vec<SearchCandidate>,
    /// Provider's explanation when it returned nothing (e.g. "Movie not found!")
    pub message: Option<String>,
    /// Items in the result array that could not be mapped
    pub skipped: usize,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// One title from an id lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleDetails {
    pub candidate: SearchCandidate,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub plot: Option<String>,
}

fn succeeded(raw: &Value) -> bool {
    raw.get(RESPONSE)
        .and_then(Value::as_str)
        .is_some_and(|flag| flag.eq_ignore_ascii_case("true"))
}

fn error_message(raw: &Value) -> Option<String> {
    raw.get(ERROR).and_then(Value::as_str).map(str::to_string)
}

/// Map a raw search response. Never fails: anything unusable yields fewer candidates.
pub fn map_search_response(raw: &Value) -> SearchOutcome {
    if !succeeded(raw) {
        let message = error_message(raw);
        debug!(message = ?message, "Search reported no results");
        return SearchOutcome {
            message,
            ..SearchOutcome::default()
        };
    }

    let Some(items) = raw.get(RESULTS).and_then(Value::as_array) else {
        debug!("Successful search response without a result array");
        return SearchOutcome::default();
    };

    let mut outcome = SearchOutcome::default();
    for (index, item) in items.iter().enumerate() {
        match map_item(item) {
            Some(candidate) => outcome.candidates.push(candidate),
            None => {
                warn!(index, "Skipping malformed search result");
                outcome.skipped += 1;
            }
        }
    }
    debug!(count = outcome.candidates.len(), skipped = outcome.skipped, "Mapped search response");
    outcome
}

/// A single result item; `None` when the title or IMDb id is unusable.
pub fn map_item(item: &Value) -> Option<SearchCandidate> {
    let item = item.as_object()?;
    let title = present_text(item.get(TITLE))?;
    let imdb_id = present_text(item.get(IMDB_ID))?;

    Some(SearchCandidate {
        title,
        year: present_text(item.get(YEAR)),
        imdb_id,
        poster_url: present_text(item.get(POSTER)),
    })
}

/// Map an id lookup response.
///
/// `Err` carries the provider's message (if any) when it found nothing or the
/// record lacks a usable title or id.
pub fn map_title_response(raw: &Value) -> Result<TitleDetails, Option<String>> {
    if !succeeded(raw) {
        return Err(error_message(raw));
    }
    let Some(candidate) = map_item(raw) else {
        warn!("Id lookup returned a record without title or id");
        return Err(None);
    };
    Ok(TitleDetails {
        candidate,
        runtime: present_text(raw.get(RUNTIME)),
        genre: present_text(raw.get(GENRE)),
        director: present_text(raw.get(DIRECTOR)),
        plot: present_text(raw.get(PLOT)),
    })
}

/// Trimmed text for a field, treating blanks and `N/A` as absent.
fn present_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() || text.eq_ignore_ascii_case(NOT_AVAILABLE) {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests;
