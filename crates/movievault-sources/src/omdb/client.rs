use async_trait::async_trait;
use movievault_config::{default_omdb_base_url, Config, CredentialStore};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use crate::error::SearchError;
use crate::omdb::api;
use crate::traits::SearchService;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_options(api_key, default_omdb_base_url(), DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SearchError::NotConfigured("OMDb api key is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("movievault/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url: base_url.into(),
        })
    }

    /// Build from configuration; a key in the credential store overrides `omdb.api_key`.
    ///
    /// Returns `Ok(None)` when OMDb is disabled or has no usable key.
    pub fn from_config(config: &Config, credentials: &CredentialStore) -> Result<Option<Self>, SearchError> {
        let stored_key = credentials
            .get_omdb_api_key()
            .filter(|k| !k.trim().is_empty())
            .cloned();

        let client = match (&config.omdb, stored_key) {
            (Some(omdb), _) if !omdb.enabled => None,
            (Some(omdb), key) => {
                let key = key.unwrap_or_else(|| omdb.api_key.clone());
                if key.trim().is_empty() || key == "YOUR_API_KEY" {
                    None
                } else {
                    Some(Self::with_options(
                        key,
                        omdb.base_url.clone(),
                        Duration::from_secs(omdb.timeout_seconds),
                    )?)
                }
            }
            (None, Some(key)) => Some(Self::new(key)?),
            (None, None) => None,
        };

        if client.is_some() {
            info!("OMDb search configured");
        }
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full record for one title, raw
    pub async fn fetch_by_imdb_id(&self, imdb_id: &str) -> Result<Value, SearchError> {
        api::lookup_by_imdb_id(&self.client, &self.base_url, &self.api_key, imdb_id).await
    }
}

#[async_trait]
impl SearchService for OmdbClient {
    fn service_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, text: &str) -> Result<Value, SearchError> {
        api::search_titles(&self.client, &self.base_url, &self.api_key, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movievault_config::OmdbConfig;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::PathBuf;
    use std::thread::JoinHandle;

    /// Answer one HTTP request with `status` and a JSON `body`; the thread yields the request line.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            stream.write_all(response.as_bytes()).unwrap();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{addr}/"), handle)
    }

    fn config_with(omdb: Option<OmdbConfig>) -> Config {
        Config {
            omdb,
            ..Config::default()
        }
    }

    fn omdb(enabled: bool, api_key: &str) -> OmdbConfig {
        OmdbConfig {
            enabled,
            api_key: api_key.to_string(),
            base_url: "http://localhost:9/".to_string(),
            timeout_seconds: 3,
        }
    }

    #[test]
    fn test_new_rejects_empty_key() {
        assert!(matches!(OmdbClient::new("  "), Err(SearchError::NotConfigured(_))));
    }

    #[test]
    fn test_from_config() {
        let empty_creds = CredentialStore::new(PathBuf::from("/tmp/unused"));

        assert!(OmdbClient::from_config(&config_with(None), &empty_creds).unwrap().is_none());
        assert!(OmdbClient::from_config(&config_with(Some(omdb(false, "k"))), &empty_creds)
            .unwrap()
            .is_none());
        assert!(OmdbClient::from_config(&config_with(Some(omdb(true, "YOUR_API_KEY"))), &empty_creds)
            .unwrap()
            .is_none());

        let client = OmdbClient::from_config(&config_with(Some(omdb(true, "k"))), &empty_creds)
            .unwrap()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9/");

        let mut creds = CredentialStore::new(PathBuf::from("/tmp/unused"));
        creds.set_omdb_api_key("stored".to_string());
        let client = OmdbClient::from_config(&config_with(None), &creds).unwrap().unwrap();
        assert_eq!(client.base_url(), "https://www.omdbapi.com/");
    }

    #[tokio::test]
    async fn test_fetch_by_imdb_id() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"Title":"The Matrix","imdbID":"tt0133093","Runtime":"136 min","Response":"True"}"#,
        );
        let client = OmdbClient::with_options("key123", url, Duration::from_secs(5)).unwrap();

        let raw = client.fetch_by_imdb_id("tt0133093").await.unwrap();
        assert_eq!(raw["Title"], "The Matrix");

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /?"));
        assert!(request_line.contains("apikey=key123"));
        assert!(request_line.contains("i=tt0133093"));
    }

    #[tokio::test]
    async fn test_search_error_status_carries_provider_message() {
        let (url, server) = serve_once("401 Unauthorized", r#"{"Response":"False","Error":"Invalid API key!"}"#);
        let client = OmdbClient::with_options("bad", url, Duration::from_secs(5)).unwrap();

        let err = client.search("matrix").await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::Api { status: 401, ref message } if message == "Invalid API key!"
        ));
        assert!(server.join().unwrap().contains("s=matrix"));
    }
}
