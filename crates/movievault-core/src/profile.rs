use movievault_models::{fields, DocumentPatch, Session, ValidationError};
use movievault_sources::{AuthProfile, RemoteStore};
use std::sync::Arc;
use tracing::{info, instrument};
use crate::clock::{Clock, SystemClock};
use crate::error::EngineError;

/// Display-name changes, kept in step between the auth principal and the profile document.
pub struct ProfileService {
    auth: Arc<dyn AuthProfile>,
    store: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    pub fn new(auth: Arc<dyn AuthProfile>, store: Arc<dyn RemoteStore>) -> Self {
        Self::with_clock(auth, store, Arc::new(SystemClock))
    }

    pub fn with_clock(auth: Arc<dyn AuthProfile>, store: Arc<dyn RemoteStore>, clock: Arc<dyn Clock>) -> Self {
        Self { auth, store, clock }
    }

    /// Rename the user: auth principal first, then the profile document copy.
    ///
    /// Returns the stored (trimmed) name. If the principal update fails the
    /// profile document is not written.
    #[instrument(skip(self, session), fields(session = %session.user_id))]
    pub async fn rename(&self, session: &Session, name: &str) -> Result<String, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyDisplayName.into());
        }

        self.auth.set_display_name(session, name).await?;

        let now = self.clock.now_millis();
        let mut patch = DocumentPatch::new()
            .set(fields::DISPLAY_NAME, name)
            .set(fields::UPDATED_AT, now);
        if let Some(email) = &session.email {
            patch = patch.set(fields::EMAIL, email.as_str());
        }
        let has_created_at = self
            .store
            .get_profile(session.id())
            .await?
            .is_some_and(|profile| profile.contains_key(fields::CREATED_AT));
        if !has_created_at {
            patch = patch.set(fields::CREATED_AT, now);
        }

        self.store.merge_profile(session.id(), patch).await?;
        info!(display_name = %name, "Profile renamed");
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use movievault_sources::{LocalStore, StoreError};
    use serde_json::json;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct StepClock(AtomicI64);

    impl Clock for StepClock {
        fn now_millis(&self) -> i64 {
            self.0.fetch_add(1_000, Ordering::SeqCst)
        }
    }

    struct RejectingAuth;

    #[async_trait]
    impl AuthProfile for RejectingAuth {
        async fn set_display_name(&self, _session: &Session, _name: &str) -> Result<(), StoreError> {
            Err(StoreError::Auth("requires recent login".into()))
        }
    }

    fn service(store: &LocalStore) -> ProfileService {
        ProfileService::with_clock(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(StepClock(AtomicI64::new(10_000))),
        )
    }

    #[tokio::test]
    async fn test_rename_updates_principal_and_profile() {
        let store = LocalStore::in_memory();
        let session = Session::new("user-1").with_email("ada@example.com");

        let name = service(&store).rename(&session, "  Ada  ").await.unwrap();
        assert_eq!(name, "Ada");
        assert_eq!(store.account_display_name(session.id()).as_deref(), Some("Ada"));

        let profile = store.get_profile(session.id()).await.unwrap().unwrap();
        assert_eq!(profile.get(fields::DISPLAY_NAME), Some(&json!("Ada")));
        assert_eq!(profile.get(fields::EMAIL), Some(&json!("ada@example.com")));
        assert_eq!(profile.get(fields::CREATED_AT), Some(&json!(10_000)));
        assert_eq!(profile.get(fields::UPDATED_AT), Some(&json!(10_000)));
    }

    #[tokio::test]
    async fn test_second_rename_keeps_created_at() {
        let store = LocalStore::in_memory();
        let session = Session::new("user-1");
        let service = service(&store);

        service.rename(&session, "Ada").await.unwrap();
        service.rename(&session, "Ada L.").await.unwrap();

        let profile = store.get_profile(session.id()).await.unwrap().unwrap();
        assert_eq!(profile.get(fields::DISPLAY_NAME), Some(&json!("Ada L.")));
        assert_eq!(profile.get(fields::CREATED_AT), Some(&json!(10_000)));
        assert_eq!(profile.get(fields::UPDATED_AT), Some(&json!(11_000)));
        assert!(!profile.contains_key(fields::EMAIL));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let store = LocalStore::in_memory();
        let session = Session::new("user-1");

        let err = service(&store).rename(&session, " \n ").await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(ValidationError::EmptyDisplayName)));
        assert!(store.get_profile(session.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_principal_failure_skips_profile_write() {
        let store = LocalStore::in_memory();
        let session = Session::new("user-1");
        let service = ProfileService::new(Arc::new(RejectingAuth), Arc::new(store.clone()));

        let err = service.rename(&session, "Ada").await.unwrap_err();
        assert!(matches!(err, EngineError::Store(StoreError::Auth(_))));
        assert!(store.get_profile(session.id()).await.unwrap().is_none());
    }
}
