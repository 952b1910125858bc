use serde_json::Value;
use crate::candidate::SearchCandidate;
use crate::document::{fields, Document, DocumentPatch};
use crate::error::ValidationError;
use crate::field_update::FieldUpdate;
use crate::rating::Rating;
use crate::review::{normalize_optional, normalize_review};
use crate::status::MovieStatus;

/// Raw create input, as entered on a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieDraft {
    pub title: String,
    pub status: MovieStatus,
    /// Rating text; blank means no rating
    pub rating: String,
    pub review: String,
    pub poster_url: Option<String>,
    pub imdb_id: Option<String>,
}

impl MovieDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Draft for an imported search candidate: always WATCHLIST, never rated or reviewed.
    pub fn from_candidate(candidate: &SearchCandidate) -> Self {
        Self {
            title: candidate.title.clone(),
            status: MovieStatus::Watchlist,
            rating: String::new(),
            review: String::new(),
            poster_url: candidate.poster_url.clone(),
            imdb_id: Some(candidate.imdb_id.clone()),
        }
    }

    pub fn with_status(mut self, status: MovieStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self
    }

    pub fn with_review(mut self, review: impl Into<String>) -> Self {
        self.review = review.into();
        self
    }

    pub fn validate(self) -> Result<NewMovie, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(NewMovie {
            title: title.to_string(),
            status: self.status,
            rating: Rating::parse(&self.rating)?,
            review: normalize_review(&self.review),
            poster_url: normalize_optional(self.poster_url.as_deref()),
            imdb_id: normalize_optional(self.imdb_id.as_deref()),
        })
    }
}

/// Validated create input. Only constructed through [`MovieDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    title: String,
    status: MovieStatus,
    rating: Option<Rating>,
    review: Option<String>,
    poster_url: Option<String>,
    imdb_id: Option<String>,
}

impl NewMovie {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> MovieStatus {
        self.status
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn review(&self) -> Option<&str> {
        self.review.as_deref()
    }

    /// Document to submit to the store, stamped `createdAt = updatedAt = now`.
    pub fn into_document(self, now: i64) -> Document {
        let mut doc = Document::new();
        doc.insert(fields::TITLE.into(), Value::from(self.title));
        doc.insert(fields::STATUS.into(), Value::from(self.status.as_str()));
        if let Some(rating) = self.rating {
            doc.insert(fields::RATING.into(), Value::from(rating.value()));
        }
        if let Some(review) = self.review {
            doc.insert(fields::REVIEW.into(), Value::from(review));
        }
        if let Some(poster_url) = self.poster_url {
            doc.insert(fields::POSTER_URL.into(), Value::from(poster_url));
        }
        if let Some(imdb_id) = self.imdb_id {
            doc.insert(fields::IMDB_ID.into(), Value::from(imdb_id));
        }
        doc.insert(fields::CREATED_AT.into(), Value::from(now));
        doc.insert(fields::UPDATED_AT.into(), Value::from(now));
        doc
    }
}

/// Raw partial-update intent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub status: Option<MovieStatus>,
    /// Rating text; `Set` with blank text is the same as `Remove`
    pub rating: FieldUpdate<String>,
    /// Review text; `Set` with text that trims to blank is the same as `Remove`
    pub review: FieldUpdate<String>,
}

impl MovieUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn status(mut self, status: MovieStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = FieldUpdate::Set(rating.into());
        self
    }

    pub fn clear_rating(mut self) -> Self {
        self.rating = FieldUpdate::Remove;
        self
    }

    pub fn review(mut self, review: impl Into<String>) -> Self {
        self.review = FieldUpdate::Set(review.into());
        self
    }

    pub fn clear_review(mut self) -> Self {
        self.review = FieldUpdate::Remove;
        self
    }

    pub fn validate(self) -> Result<MoviePatch, ValidationError> {
        let title = match self.title {
            Some(t) => {
                let trimmed = t.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyTitle);
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        let rating = self.rating.try_normalize(|text| Rating::parse(&text))?;
        let review = self
            .review
            .try_normalize(|text| Ok::<_, ValidationError>(normalize_review(&text)))?;

        Ok(MoviePatch {
            title,
            status: self.status,
            rating,
            review,
        })
    }
}

/// Validated partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePatch {
    title: Option<String>,
    status: Option<MovieStatus>,
    rating: FieldUpdate<Rating>,
    review: FieldUpdate<String>,
}

impl MoviePatch {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn status(&self) -> Option<MovieStatus> {
        self.status
    }

    pub fn rating(&self) -> &FieldUpdate<Rating> {
        &self.rating
    }

    pub fn review(&self) -> &FieldUpdate<String> {
        &self.review
    }

    /// Field writes for the store; `updatedAt` is always written.
    pub fn into_document_patch(self, updated_at: i64) -> DocumentPatch {
        let mut patch = DocumentPatch::new();
        if let Some(title) = self.title {
            patch = patch.set(fields::TITLE, title);
        }
        if let Some(status) = self.status {
            patch = patch.set(fields::STATUS, status.as_str());
        }
        patch = match self.rating {
            FieldUpdate::Keep => patch,
            FieldUpdate::Set(rating) => patch.set(fields::RATING, rating.value()),
            FieldUpdate::Remove => patch.remove(fields::RATING),
        };
        patch = match self.review {
            FieldUpdate::Keep => patch,
            FieldUpdate::Set(review) => patch.set(fields::REVIEW, review),
            FieldUpdate::Remove => patch.remove(fields::REVIEW),
        };
        patch.set(fields::UPDATED_AT, updated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldValue;
    use serde_json::json;

    #[test]
    fn test_draft_rejects_blank_title() {
        assert_eq!(MovieDraft::new("   ").validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_draft_rejects_bad_rating() {
        let err = MovieDraft::new("Heat").with_rating("11").validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidRating("11".into()));
    }

    #[test]
    fn test_draft_normalizes_fields() {
        let movie = MovieDraft::new("  Heat ")
            .with_rating(" ")
            .with_review("  \n")
            .validate()
            .unwrap();
        assert_eq!(movie.title(), "Heat");
        assert_eq!(movie.rating(), None);
        assert_eq!(movie.review(), None);
        assert_eq!(movie.status(), MovieStatus::Watchlist);
    }

    #[test]
    fn test_new_movie_document_has_equal_timestamps_and_no_empty_fields() {
        let doc = MovieDraft::new("Heat")
            .with_status(MovieStatus::Watched)
            .with_rating("8")
            .validate()
            .unwrap()
            .into_document(42);
        assert_eq!(doc.get(fields::CREATED_AT), Some(&json!(42)));
        assert_eq!(doc.get(fields::UPDATED_AT), Some(&json!(42)));
        assert_eq!(doc.get(fields::RATING), Some(&json!(8)));
        assert_eq!(doc.get(fields::STATUS), Some(&json!("WATCHED")));
        assert!(!doc.contains_key(fields::REVIEW));
        assert!(!doc.contains_key(fields::POSTER_URL));
    }

    #[test]
    fn test_from_candidate() {
        let candidate = SearchCandidate {
            title: "The Matrix".into(),
            year: Some("1999".into()),
            imdb_id: "tt0133093".into(),
            poster_url: None,
        };
        let movie = MovieDraft::from_candidate(&candidate).validate().unwrap();
        let doc = movie.into_document(1);
        assert_eq!(doc.get(fields::IMDB_ID), Some(&json!("tt0133093")));
        assert_eq!(doc.get(fields::STATUS), Some(&json!("WATCHLIST")));
        assert!(!doc.contains_key(fields::POSTER_URL));
        assert!(!doc.contains_key(fields::RATING));
        assert!(!doc.contains_key(fields::REVIEW));
    }

    #[test]
    fn test_update_clear_rating_keep_review() {
        let patch = MovieUpdate::new()
            .clear_rating()
            .review(" kept ")
            .validate()
            .unwrap()
            .into_document_patch(99);
        assert_eq!(patch.get(fields::RATING), Some(&FieldValue::Remove));
        assert_eq!(patch.get(fields::REVIEW), Some(&FieldValue::Set(json!("kept"))));
        assert_eq!(patch.get(fields::UPDATED_AT), Some(&FieldValue::Set(json!(99))));
        assert_eq!(patch.get(fields::STATUS), None);
    }

    #[test]
    fn test_update_blank_inputs_become_removals() {
        let patch = MovieUpdate::new().rating("").review("   ").validate().unwrap();
        assert_eq!(patch.rating(), &FieldUpdate::Remove);
        assert_eq!(patch.review(), &FieldUpdate::Remove);
    }

    #[test]
    fn test_update_validation() {
        assert_eq!(
            MovieUpdate::new().title(" ").validate(),
            Err(ValidationError::EmptyTitle)
        );
        assert!(matches!(
            MovieUpdate::new().rating("0").validate(),
            Err(ValidationError::InvalidRating(_))
        ));
    }

    #[test]
    fn test_update_with_nothing_still_touches_updated_at() {
        let patch = MovieUpdate::new().validate().unwrap().into_document_patch(7);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get(fields::UPDATED_AT), Some(&FieldValue::Set(json!(7))));
    }
}
