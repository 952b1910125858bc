//! Builds the store and search backends from configuration.

use anyhow::{Context, Result};
use movievault_config::{Config, CredentialStore, PathManager};
use std::sync::Arc;
use tracing::info;
use crate::local::LocalStore;
use crate::omdb::OmdbClient;
use crate::traits::SearchService;

/// Open the file-backed document store at the configured location.
pub fn open_local_store(config: &Config, paths: &PathManager) -> Result<LocalStore> {
    let path = config.store_path(paths);
    let store = LocalStore::open(&path)
        .with_context(|| format!("Failed to open store at {}", path.display()))?;
    info!(path = %path.display(), "Opened local store");
    Ok(store)
}

/// The configured search service, or `None` when search is not set up.
pub fn create_search_service(
    config: &Config,
    credentials: &CredentialStore,
) -> Result<Option<Arc<dyn SearchService>>> {
    let client = OmdbClient::from_config(config, credentials).context("Failed to create OMDb client")?;
    Ok(client.map(|c| Arc::new(c) as Arc<dyn SearchService>))
}
