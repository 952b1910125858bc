use movievault_models::{MovieDraft, MovieId, SearchCandidate, ValidationError};
use movievault_sources::SearchService;
use std::sync::Arc;
use tracing::{info, instrument};
use crate::error::EngineError;
use crate::mapper::{map_search_response, SearchOutcome};
use crate::sync::SyncEngine;

/// Run a search against `service` and map the raw response.
///
/// An empty outcome means "nothing found", whatever the provider's reason.
/// Needs no store or engine.
#[instrument(skip(service), fields(service = service.service_name()))]
pub async fn search_candidates(service: &dyn SearchService, query: &str) -> Result<SearchOutcome, EngineError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ValidationError::EmptyQuery.into());
    }

    let raw = service.search(query).await?;
    let outcome = map_search_response(&raw);
    info!(query = %query, count = outcome.candidates.len(), "Search complete");
    Ok(outcome)
}

/// Search, then create records from chosen candidates.
///
/// Candidates are not checked against the existing collection; importing the
/// same one twice creates two records.
pub struct ImportPipeline {
    search: Arc<dyn SearchService>,
    engine: Arc<SyncEngine>,
}

impl ImportPipeline {
    pub fn new(search: Arc<dyn SearchService>, engine: Arc<SyncEngine>) -> Self {
        Self { search, engine }
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome, EngineError> {
        search_candidates(self.search.as_ref(), query).await
    }

    /// Add a candidate to the collection as an unrated, unreviewed watchlist entry.
    #[instrument(skip(self, candidate), fields(imdb_id = %candidate.imdb_id))]
    pub async fn import(&self, candidate: &SearchCandidate) -> Result<MovieId, EngineError> {
        let id = self.engine.create(MovieDraft::from_candidate(candidate)).await?;
        info!(movie_id = %id, title = %candidate.title, "Imported search result");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use movievault_models::{fields, MovieStatus, SessionId};
    use movievault_sources::{LocalStore, SearchError};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct CannedSearch {
        response: Value,
        queries: Mutex<Vec<String>>,
    }

    impl CannedSearch {
        fn new(response: Value) -> Arc<Self> {
            Arc::new(Self {
                response,
                queries: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SearchService for CannedSearch {
        fn service_name(&self) -> &str {
            "canned"
        }

        async fn search(&self, text: &str) -> Result<Value, SearchError> {
            self.queries.lock().unwrap().push(text.to_string());
            Ok(self.response.clone())
        }
    }

    struct BrokenSearch;

    #[async_trait]
    impl SearchService for BrokenSearch {
        fn service_name(&self) -> &str {
            "broken"
        }

        async fn search(&self, _text: &str) -> Result<Value, SearchError> {
            Err(SearchError::Api {
                status: 503,
                message: "unavailable".into(),
            })
        }
    }

    fn live_engine() -> (Arc<SyncEngine>, LocalStore) {
        let store = LocalStore::in_memory();
        let engine = Arc::new(SyncEngine::new(Arc::new(store.clone())));
        engine.start(&SessionId::new("user-1"));
        (engine, store)
    }

    fn matrix() -> SearchCandidate {
        SearchCandidate {
            title: "The Matrix".into(),
            year: Some("1999".into()),
            imdb_id: "tt0133093".into(),
            poster_url: Some("https://img.example/matrix.jpg".into()),
        }
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_search() {
        let search = CannedSearch::new(json!({ "Response": "True", "Search": [] }));
        let (engine, _store) = live_engine();
        let pipeline = ImportPipeline::new(search.clone(), engine);

        let err = pipeline.search("   ").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(ValidationError::EmptyQuery)));
        assert!(search.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_results_is_not_an_error() {
        let search = CannedSearch::new(json!({ "Response": "False", "Error": "Movie not found!" }));
        let (engine, _store) = live_engine();
        let pipeline = ImportPipeline::new(search.clone(), engine);

        let outcome = pipeline.search("Matrix").await.unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.message.as_deref(), Some("Movie not found!"));
    }

    #[tokio::test]
    async fn test_search_trims_query_and_maps() {
        let search = CannedSearch::new(json!({
            "Response": "True",
            "Search": [{ "Title": "The Matrix", "Year": "1999", "imdbID": "tt0133093", "Poster": "N/A" }]
        }));
        let (engine, _store) = live_engine();
        let pipeline = ImportPipeline::new(search.clone(), engine);

        let outcome = pipeline.search("  matrix ").await.unwrap();
        assert_eq!(*search.queries.lock().unwrap(), vec!["matrix"]);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].poster_url, None);
    }

    #[tokio::test]
    async fn test_search_failure_is_an_error() {
        let (engine, _store) = live_engine();
        let pipeline = ImportPipeline::new(Arc::new(BrokenSearch), engine);

        let err = pipeline.search("Matrix").await.unwrap_err();
        assert!(matches!(err, EngineError::Search(SearchError::Api { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_search_without_engine() {
        let search = CannedSearch::new(json!({
            "Response": "True",
            "Search": [{ "Title": "Heat", "Year": "1995", "imdbID": "tt0113277", "Poster": "N/A" }]
        }));

        let outcome = search_candidates(search.as_ref(), " heat ").await.unwrap();
        assert_eq!(outcome.candidates[0].title, "Heat");
        assert_eq!(*search.queries.lock().unwrap(), vec!["heat"]);

        let err = search_candidates(search.as_ref(), "").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(ValidationError::EmptyQuery)));
        assert_eq!(search.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_import_creates_watchlist_record() {
        let (engine, store) = live_engine();
        let pipeline = ImportPipeline::new(CannedSearch::new(json!({})), engine.clone());

        let id = pipeline.import(&matrix()).await.unwrap();

        let view = engine.view();
        let movie = view.get(&id).unwrap();
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.status, MovieStatus::Watchlist);
        assert_eq!(movie.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(movie.poster_url.as_deref(), Some("https://img.example/matrix.jpg"));
        assert_eq!(movie.rating, None);
        assert_eq!(movie.review, None);

        let doc = &store.documents(&SessionId::new("user-1"))[0].fields;
        assert!(!doc.contains_key(fields::RATING));
        assert!(!doc.contains_key(fields::REVIEW));
    }

    #[tokio::test]
    async fn test_importing_twice_creates_two_records() {
        let (engine, _store) = live_engine();
        let pipeline = ImportPipeline::new(CannedSearch::new(json!({})), engine.clone());

        let first = pipeline.import(&matrix()).await.unwrap();
        let second = pipeline.import(&matrix()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(engine.view().movies.len(), 2);
    }

    #[tokio::test]
    async fn test_import_requires_live_engine() {
        let engine = Arc::new(SyncEngine::new(Arc::new(LocalStore::in_memory())));
        let pipeline = ImportPipeline::new(CannedSearch::new(json!({})), engine);

        let err = pipeline.import(&matrix()).await.unwrap_err();
        assert!(matches!(err, EngineError::NoSession));
    }
}
