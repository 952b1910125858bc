use async_trait::async_trait;
use movievault_models::{Document, DocumentPatch, MovieId, Session, SessionId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::error::{SearchError, StoreError};
use crate::subscription::SubscriptionHandle;

/// A document in a user's movie collection, as listed by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: MovieId,
    pub fields: Document,
}

/// What a live subscription delivers.
#[derive(Debug, Clone)]
pub enum SubscriptionEvent {
    /// Complete listing of the collection, in store order. Never a diff.
    Snapshot(Vec<StoredDocument>),
    Error(StoreError),
}

/// Callback invoked by the store for every delivery on a subscription.
///
/// May be called from any thread, including synchronously from inside
/// `subscribe` or a write call.
pub type SnapshotListener = Arc<dyn Fn(SubscriptionEvent) + Send + Sync>;

/// Per-user document store the sync engine talks through.
///
/// Every call is scoped to one session. The store is the serializing authority
/// for writes; callers do no ordering or locking of their own.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    fn store_name(&self) -> &str;

    /// Open a change subscription on the session's movie collection.
    fn subscribe(
        &self,
        session: &SessionId,
        listener: SnapshotListener,
    ) -> Result<SubscriptionHandle, StoreError>;

    /// Add a document; the store assigns and returns its id.
    async fn create(&self, session: &SessionId, doc: Document) -> Result<MovieId, StoreError>;

    /// Apply field writes to an existing document. `FieldValue::Remove` deletes the key.
    async fn update(
        &self,
        session: &SessionId,
        id: &MovieId,
        patch: DocumentPatch,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing id succeeds.
    async fn delete(&self, session: &SessionId, id: &MovieId) -> Result<(), StoreError>;

    /// The user's profile document, if one has been written.
    async fn get_profile(&self, session: &SessionId) -> Result<Option<Document>, StoreError>;

    /// Merge field writes into the user's profile document, creating it if needed.
    async fn merge_profile(&self, session: &SessionId, patch: DocumentPatch) -> Result<(), StoreError>;
}

/// The authentication principal's own profile (separate from stored documents)
#[async_trait]
pub trait AuthProfile: Send + Sync {
    async fn set_display_name(&self, session: &Session, name: &str) -> Result<(), StoreError>;
}

/// External movie search endpoint.
///
/// Returns the raw response body; interpretation belongs to the search result mapper.
#[async_trait]
pub trait SearchService: Send + Sync {
    fn service_name(&self) -> &str;

    async fn search(&self, text: &str) -> Result<serde_json::Value, SearchError>;
}
