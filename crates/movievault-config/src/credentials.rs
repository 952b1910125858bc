use anyhow::Result;
use chrono::{DateTime, Utc};
use movievault_models::Session;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_omdb_api_key(&self) -> Option<&String> {
        self.get("omdb_api_key")
    }

    pub fn set_omdb_api_key(&mut self, key: String) {
        self.set("omdb_api_key".to_string(), key);
    }

    /// The signed-in session, if any
    pub fn session(&self) -> Option<Session> {
        let user_id = self.get("session_user_id").filter(|id| !id.trim().is_empty())?;
        let mut session = Session::new(user_id.clone());
        session.email = self.get("session_email").cloned();
        session.display_name = self.get("session_display_name").cloned();
        Some(session)
    }

    pub fn set_session(&mut self, session: &Session) {
        self.set("session_user_id".to_string(), session.user_id.to_string());
        match &session.email {
            Some(email) => self.set("session_email".to_string(), email.clone()),
            None => self.remove("session_email"),
        }
        match &session.display_name {
            Some(name) => self.set("session_display_name".to_string(), name.clone()),
            None => self.remove("session_display_name"),
        }
        self.set("session_signed_in_at".to_string(), Utc::now().to_rfc3339());
    }

    /// Keep the cached name in step after a rename
    pub fn set_session_display_name(&mut self, name: &str) {
        self.set("session_display_name".to_string(), name.to_string());
    }

    pub fn session_signed_in_at(&self) -> Option<DateTime<Utc>> {
        self.get("session_signed_in_at")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn clear_session(&mut self) {
        for key in ["session_user_id", "session_email", "session_display_name", "session_signed_in_at"] {
            self.remove(key);
        }
    }
}
