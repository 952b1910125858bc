use movievault_models::{MovieDraft, MovieId, MovieRecord, MovieUpdate, SessionId};
use movievault_sources::{RemoteStore, SnapshotListener, StoredDocument, SubscriptionEvent, SubscriptionHandle};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use crate::clock::{Clock, SystemClock};
use crate::error::EngineError;

/// Lifecycle of the engine's change subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum EngineState {
    #[default]
    Unsubscribed,
    Subscribing,
    Live,
    Error,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Unsubscribed => "unsubscribed",
            EngineState::Subscribing => "subscribing",
            EngineState::Live => "live",
            EngineState::Error => "error",
        };
        f.write_str(name)
    }
}

/// What the presentation layer renders: state, collection, last failure.
#[derive(Debug, Clone, Default)]
pub struct EngineView {
    pub state: EngineState,
    pub session: Option<SessionId>,
    /// Records in the order the store listed them in the last snapshot
    pub movies: Vec<MovieRecord>,
    pub last_error: Option<String>,
    generation: u64,
}

impl EngineView {
    /// Subscribed but no snapshot yet
    pub fn is_loading(&self) -> bool {
        self.state == EngineState::Subscribing
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, id: &MovieId) -> Option<&MovieRecord> {
        self.movies.iter().find(|m| &m.id == id)
    }

    /// Bumped on every start and teardown; deliveries tagged with an older value are dropped
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct ActiveSubscription {
    session: SessionId,
    handle: SubscriptionHandle,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps an in-memory view of one user's movie collection in step with the store.
///
/// The view is replaced wholesale by each snapshot the subscription delivers.
/// Writes go straight to the store and never touch the view; the snapshot that
/// follows a write is the only way its effect becomes visible.
pub struct SyncEngine {
    store: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
    view: Arc<watch::Sender<EngineView>>,
    active: Mutex<Option<ActiveSubscription>>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn RemoteStore>, clock: Arc<dyn Clock>) -> Self {
        let (view, _) = watch::channel(EngineView::default());
        Self {
            store,
            clock,
            view: Arc::new(view),
            active: Mutex::new(None),
        }
    }

    /// Snapshot of the current view
    pub fn view(&self) -> EngineView {
        self.view.borrow().clone()
    }

    pub fn state(&self) -> EngineState {
        self.view.borrow().state
    }

    /// Receiver that is notified whenever the view changes
    pub fn watch(&self) -> watch::Receiver<EngineView> {
        self.view.subscribe()
    }

    /// Session of the open subscription, if any
    pub fn session(&self) -> Option<SessionId> {
        lock(&self.active).as_ref().map(|a| a.session.clone())
    }

    /// Subscribe to `session`'s collection, replacing any existing subscription.
    ///
    /// The previous subscription is cancelled before the new one is opened. The
    /// collection is cleared when the session differs from the previous one.
    pub fn start(&self, session: &SessionId) {
        let mut active = lock(&self.active);
        if let Some(previous) = active.take() {
            debug!(session = %previous.session, "Cancelling previous subscription");
            previous.handle.cancel();
        }

        let mut generation = 0;
        self.view.send_modify(|view| {
            view.generation += 1;
            generation = view.generation;
            if view.session.as_ref() != Some(session) {
                view.movies.clear();
            }
            view.session = Some(session.clone());
            view.state = EngineState::Subscribing;
            view.last_error = None;
        });
        info!(session = %session, generation, store = self.store.store_name(), "Subscribing to collection");

        match self.store.subscribe(session, self.listener(generation)) {
            Ok(handle) => {
                *active = Some(ActiveSubscription {
                    session: session.clone(),
                    handle,
                });
            }
            Err(err) => {
                warn!(session = %session, error = %err, "Subscription failed");
                self.view.send_if_modified(|view| {
                    if view.generation != generation {
                        return false;
                    }
                    view.state = EngineState::Error;
                    view.last_error = Some(err.to_string());
                    true
                });
            }
        }
    }

    /// Cancel the subscription and move to `Unsubscribed`. Safe to call repeatedly.
    ///
    /// The last collection stays in the view; deliveries that arrive afterwards are ignored.
    pub fn teardown(&self) {
        if let Some(previous) = lock(&self.active).take() {
            previous.handle.cancel();
            info!(session = %previous.session, "Subscription torn down");
        }
        self.view.send_if_modified(|view| {
            if view.state == EngineState::Unsubscribed {
                return false;
            }
            view.generation += 1;
            view.state = EngineState::Unsubscribed;
            true
        });
    }

    /// Validate and submit a new record. Returns the store-assigned id.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: MovieDraft) -> Result<MovieId, EngineError> {
        let movie = draft.validate()?;
        let session = self.live_session()?;
        let doc = movie.into_document(self.clock.now_millis());

        let id = self.store.create(&session, doc).await?;
        info!(session = %session, movie_id = %id, "Movie created");
        Ok(id)
    }

    /// Validate and submit a partial update; `updatedAt` is always written.
    #[instrument(skip(self, update), fields(movie_id = %id))]
    pub async fn update(&self, id: &MovieId, update: MovieUpdate) -> Result<(), EngineError> {
        let patch = update.validate()?;
        let session = self.live_session()?;

        let now = self.clock.now_millis();
        let created_at = self.view.borrow().get(id).map(|m| m.created_at);
        let updated_at = created_at.map_or(now, |created| now.max(created));

        self.store
            .update(&session, id, patch.into_document_patch(updated_at))
            .await?;
        info!(session = %session, movie_id = %id, "Movie updated");
        Ok(())
    }

    /// Submit a delete. Deleting an id that is already gone succeeds.
    #[instrument(skip(self), fields(movie_id = %id))]
    pub async fn delete(&self, id: &MovieId) -> Result<(), EngineError> {
        let session = self.live_session()?;
        self.store.delete(&session, id).await?;
        info!(session = %session, movie_id = %id, "Movie deleted");
        Ok(())
    }

    /// Wait until the subscription has either delivered or failed.
    pub async fn settled(&self) -> EngineView {
        let mut rx = self.view.subscribe();
        let settled = rx
            .wait_for(|view| view.state != EngineState::Subscribing)
            .await
            .map(|view| view.clone());
        match settled {
            Ok(view) => view,
            Err(_) => self.view(),
        }
    }

    fn live_session(&self) -> Result<SessionId, EngineError> {
        let view = self.view.borrow();
        match (&view.session, view.state) {
            (None, _) => Err(EngineError::NoSession),
            (Some(session), EngineState::Live) => Ok(session.clone()),
            (Some(_), state) => Err(EngineError::NotLive(state)),
        }
    }

    fn listener(&self, generation: u64) -> SnapshotListener {
        let view = Arc::downgrade(&self.view);
        Arc::new(move |event: SubscriptionEvent| {
            if let Some(view) = view.upgrade() {
                apply_event(&view, generation, event);
            }
        })
    }
}

fn apply_event(view: &watch::Sender<EngineView>, generation: u64, event: SubscriptionEvent) {
    let update = match event {
        SubscriptionEvent::Snapshot(docs) => Ok(decode_snapshot(docs)),
        SubscriptionEvent::Error(err) => Err(err.to_string()),
    };

    view.send_if_modified(|current| {
        if current.generation != generation || current.state == EngineState::Unsubscribed {
            debug!(generation, current = current.generation, "Ignoring stale subscription delivery");
            return false;
        }
        match update {
            Ok(movies) => {
                debug!(generation, count = movies.len(), "Snapshot applied");
                current.movies = movies;
                current.state = EngineState::Live;
                current.last_error = None;
            }
            Err(message) => {
                warn!(generation, error = %message, "Subscription delivery failed");
                current.state = EngineState::Error;
                current.last_error = Some(message);
            }
        }
        true
    });
}

fn decode_snapshot(docs: Vec<StoredDocument>) -> Vec<MovieRecord> {
    docs.into_iter()
        .filter_map(|doc| match MovieRecord::from_document(doc.id.clone(), &doc.fields) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(movie_id = %doc.id, error = %err, "Skipping invalid movie document");
                None
            }
        })
        .collect()
}
