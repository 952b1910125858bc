use async_trait::async_trait;
use movievault_models::{Document, DocumentPatch, MovieId, Session, SessionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, info, warn};
use crate::error::StoreError;
use crate::subscription::SubscriptionHandle;
use crate::traits::{AuthProfile, RemoteStore, SnapshotListener, StoredDocument, SubscriptionEvent};

/// Local document store laid out like `users/{uid}` with a `movies` collection.
///
/// Documents live in memory and, when opened with a path, are written through
/// to a JSON file after every successful write. Listeners of a session get a
/// full snapshot on subscribe and after each write to that session.
///
/// Deliveries are serialized: the listing is read and handed to listeners
/// under one lock, so a listener never sees an older listing after a newer one.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<Inner>,
}

struct Inner {
    data: Mutex<StoreData>,
    listeners: Mutex<HashMap<u64, Listener>>,
    delivery: Mutex<()>,
    next_listener: AtomicU64,
    path: Option<PathBuf>,
}

struct Listener {
    session: SessionId,
    callback: SnapshotListener,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    users: BTreeMap<String, UserData>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserData {
    #[serde(default)]
    account: Account,
    #[serde(default)]
    profile: Document,
    #[serde(default)]
    movies: Vec<StoredDocument>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LocalStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::with_data(StoreData::default(), None)
    }

    /// Open (or start) a store backed by a JSON file
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = read_data(&path)?;
        info!(path = %path.display(), users = data.users.len(), "Opened local document store");
        Ok(Self::with_data(data, Some(path)))
    }

    fn with_data(data: StoreData, path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                data: Mutex::new(data),
                listeners: Mutex::new(HashMap::new()),
                delivery: Mutex::new(()),
                next_listener: AtomicU64::new(1),
                path,
            }),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Number of open subscriptions across all sessions
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    /// Current listing of a session's movies, in store order
    pub fn documents(&self, session: &SessionId) -> Vec<StoredDocument> {
        lock(&self.inner.data)
            .users
            .get(session.as_str())
            .map(|u| u.movies.clone())
            .unwrap_or_default()
    }

    /// Record the signed-in principal so its account exists locally
    pub fn register_account(&self, session: &Session) -> Result<(), StoreError> {
        let mut data = lock(&self.inner.data);
        let user = data.users.entry(session.user_id.to_string()).or_default();
        if session.email.is_some() {
            user.account.email = session.email.clone();
        }
        if session.display_name.is_some() {
            user.account.display_name = session.display_name.clone();
        }
        self.persist(&data)
    }

    pub fn account_display_name(&self, session: &SessionId) -> Option<String> {
        lock(&self.inner.data)
            .users
            .get(session.as_str())
            .and_then(|u| u.account.display_name.clone())
    }

    /// Re-read the backing file and push fresh snapshots to every listener.
    ///
    /// If the file can no longer be read, listeners receive the error and the
    /// in-memory documents are left as they were.
    pub fn reload(&self) -> Result<(), StoreError> {
        let Some(path) = self.inner.path.clone() else {
            return Ok(());
        };
        match read_data(&path) {
            Ok(fresh) => {
                let sessions: Vec<SessionId> = {
                    let mut data = lock(&self.inner.data);
                    *data = fresh;
                    lock(&self.inner.listeners)
                        .values()
                        .map(|l| l.session.clone())
                        .collect()
                };
                for session in sessions {
                    self.notify(&session);
                }
                Ok(())
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Local store reload failed");
                let _delivery = lock(&self.inner.delivery);
                let callbacks: Vec<SnapshotListener> = lock(&self.inner.listeners)
                    .values()
                    .map(|l| l.callback.clone())
                    .collect();
                for callback in callbacks {
                    callback(SubscriptionEvent::Error(err.clone()));
                }
                Err(err)
            }
        }
    }

    fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Deliver the current listing to every listener of `session`.
    ///
    /// Callbacks run under the delivery lock only; the data and listener locks
    /// are released before any callback is invoked.
    fn notify(&self, session: &SessionId) {
        let _delivery = lock(&self.inner.delivery);
        let callbacks: Vec<SnapshotListener> = lock(&self.inner.listeners)
            .values()
            .filter(|l| &l.session == session)
            .map(|l| l.callback.clone())
            .collect();
        if callbacks.is_empty() {
            return;
        }
        let snapshot = self.documents(session);
        debug!(session = %session, listeners = callbacks.len(), count = snapshot.len(), "Delivering snapshot");
        for callback in callbacks {
            callback(SubscriptionEvent::Snapshot(snapshot.clone()));
        }
    }
}

fn read_data(path: &Path) -> Result<StoreData, StoreError> {
    if !path.exists() {
        return Ok(StoreData::default());
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(StoreData::default());
    }
    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl RemoteStore for LocalStore {
    fn store_name(&self) -> &str {
        "local"
    }

    fn subscribe(
        &self,
        session: &SessionId,
        listener: SnapshotListener,
    ) -> Result<SubscriptionHandle, StoreError> {
        let key = self.inner.next_listener.fetch_add(1, Ordering::SeqCst);
        let _delivery = lock(&self.inner.delivery);
        lock(&self.inner.listeners).insert(
            key,
            Listener {
                session: session.clone(),
                callback: listener.clone(),
            },
        );
        debug!(session = %session, listener = key, "Subscription opened");

        // initial listing
        listener(SubscriptionEvent::Snapshot(self.documents(session)));

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        Ok(SubscriptionHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner.listeners).remove(&key);
                debug!(listener = key, "Subscription cancelled");
            }
        }))
    }

    async fn create(&self, session: &SessionId, doc: Document) -> Result<MovieId, StoreError> {
        let id = MovieId::new(uuid::Uuid::new_v4().simple().to_string());
        {
            let mut data = lock(&self.inner.data);
            data.users
                .entry(session.to_string())
                .or_default()
                .movies
                .push(StoredDocument {
                    id: id.clone(),
                    fields: doc,
                });
            if let Err(err) = self.persist(&data) {
                // keep memory and disk in step
                if let Some(user) = data.users.get_mut(session.as_str()) {
                    user.movies.retain(|d| d.id != id);
                }
                return Err(err);
            }
        }
        debug!(session = %session, movie_id = %id, "Document created");
        self.notify(session);
        Ok(id)
    }

    async fn update(
        &self,
        session: &SessionId,
        id: &MovieId,
        patch: DocumentPatch,
    ) -> Result<(), StoreError> {
        {
            let mut data = lock(&self.inner.data);
            let doc = data
                .users
                .get_mut(session.as_str())
                .and_then(|u| u.movies.iter_mut().find(|d| &d.id == id))
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            let previous = doc.fields.clone();
            patch.apply_to(&mut doc.fields);
            if let Err(err) = self.persist(&data) {
                if let Some(doc) = data
                    .users
                    .get_mut(session.as_str())
                    .and_then(|u| u.movies.iter_mut().find(|d| &d.id == id))
                {
                    doc.fields = previous;
                }
                return Err(err);
            }
        }
        debug!(session = %session, movie_id = %id, fields = patch.len(), "Document updated");
        self.notify(session);
        Ok(())
    }

    async fn delete(&self, session: &SessionId, id: &MovieId) -> Result<(), StoreError> {
        {
            let mut data = lock(&self.inner.data);
            let Some(user) = data.users.get_mut(session.as_str()) else {
                return Ok(());
            };
            let Some(index) = user.movies.iter().position(|d| &d.id == id) else {
                return Ok(());
            };
            let removed = user.movies.remove(index);
            if let Err(err) = self.persist(&data) {
                if let Some(user) = data.users.get_mut(session.as_str()) {
                    user.movies.insert(index, removed);
                }
                return Err(err);
            }
        }
        debug!(session = %session, movie_id = %id, "Document deleted");
        self.notify(session);
        Ok(())
    }

    async fn get_profile(&self, session: &SessionId) -> Result<Option<Document>, StoreError> {
        Ok(lock(&self.inner.data)
            .users
            .get(session.as_str())
            .map(|u| u.profile.clone())
            .filter(|p| !p.is_empty()))
    }

    async fn merge_profile(&self, session: &SessionId, patch: DocumentPatch) -> Result<(), StoreError> {
        let mut data = lock(&self.inner.data);
        let user = data.users.entry(session.to_string()).or_default();
        let previous = user.profile.clone();
        patch.apply_to(&mut user.profile);
        if let Err(err) = self.persist(&data) {
            if let Some(user) = data.users.get_mut(session.as_str()) {
                user.profile = previous;
            }
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthProfile for LocalStore {
    async fn set_display_name(&self, session: &Session, name: &str) -> Result<(), StoreError> {
        let mut data = lock(&self.inner.data);
        let user = data.users.entry(session.user_id.to_string()).or_default();
        let previous = user.account.display_name.replace(name.to_string());
        if let Err(err) = self.persist(&data) {
            if let Some(user) = data.users.get_mut(session.user_id.as_str()) {
                user.account.display_name = previous;
            }
            return Err(err);
        }
        Ok(())
    }
}
