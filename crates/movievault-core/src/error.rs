use movievault_models::ValidationError;
use movievault_sources::{SearchError, StoreError};
use thiserror::Error;
use crate::sync::EngineState;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("collection is not live (state: {0})")]
    NotLive(EngineState),

    #[error("no active session")]
    NoSession,
}

impl EngineError {
    /// True for input problems that never reached the store or search service
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }
}
