use thiserror::Error;

/// Input rejected before anything reaches the store or the search service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,

    #[error("rating must be a whole number between 1 and 10 (got {0:?})")]
    InvalidRating(String),

    #[error("search query is empty")]
    EmptyQuery,

    #[error("display name is empty")]
    EmptyDisplayName,
}

/// A stored document that cannot be turned into a movie record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed movie document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("movie document has a blank title")]
    BlankTitle,

    #[error("movie document carries a blank review")]
    BlankReview,

    #[error("movie document was updated ({updated_at}) before it was created ({created_at})")]
    TimestampOrder { created_at: i64, updated_at: i64 },
}
