use thiserror::Error;

/// Failures reported by the remote document store.
///
/// Cloneable so a single subscription failure can be fanned out to every
/// listener of a session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store transport error: {0}")]
    Transport(String),

    #[error("store auth error: {0}")]
    Auth(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("store data error: {0}")]
    Decode(String),

    #[error("store I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Failures of the external movie search service.
///
/// "No matches" is not one of these; it is an empty result.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("search service not configured: {0}")]
    NotConfigured(String),
}
