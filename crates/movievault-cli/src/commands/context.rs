use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use movievault_config::{Config, CredentialStore, PathManager};
use movievault_core::{EngineState, SyncEngine};
use movievault_models::Session;
use movievault_sources::{open_local_store, LocalStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Everything a command needs from disk: paths, config, credentials.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

        Ok(Self {
            paths,
            config,
            credentials,
        })
    }

    pub fn require_session(&self) -> Result<Session> {
        self.credentials
            .session()
            .ok_or_else(|| eyre!("Not signed in. Run 'movievault login <user-id>' first."))
    }

    pub fn open_store(&self) -> Result<LocalStore> {
        self.paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create data directories: {}", e))?;
        open_local_store(&self.config, &self.paths).map_err(|e| eyre!("{:#}", e))
    }

    /// Subscribe to the signed-in user's collection and wait until it is live.
    pub async fn live_engine(&self, wait: Duration, output: &Output) -> Result<(Arc<SyncEngine>, Session)> {
        let session = self.require_session()?;
        let store = self.open_store()?;
        let engine = Arc::new(SyncEngine::new(Arc::new(store)));
        engine.start(session.id());

        let spinner = super::spinner(output, "Loading your collection...");
        let settled = tokio::time::timeout(wait, engine.settled()).await;
        spinner.finish_and_clear();

        let view = settled.map_err(|_| {
            engine.teardown();
            eyre!("Timed out after {}ms waiting for your collection", wait.as_millis())
        })?;
        debug!(state = %view.state, count = view.movies.len(), "Collection settled");

        match view.state {
            EngineState::Live => Ok((engine, session)),
            state => {
                engine.teardown();
                Err(eyre!(
                    "Could not load your collection ({}): {}",
                    state,
                    view.last_error.unwrap_or_else(|| "unknown error".to_string())
                ))
            }
        }
    }
}
