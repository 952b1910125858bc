use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use crate::error::SearchError;

/// Title search (`s=`). Returns the raw body; a `"Response": "False"` body is not an error here.
pub async fn search_titles(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Value, SearchError> {
    debug!(query = %query, "OMDb title search");
    fetch(client, base_url, &[("apikey", api_key), ("s", query)]).await
}

/// Single-title lookup by IMDb id (`i=`)
pub async fn lookup_by_imdb_id(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<Value, SearchError> {
    debug!(imdb_id = %imdb_id, "OMDb id lookup");
    fetch(client, base_url, &[("apikey", api_key), ("i", imdb_id)]).await
}

async fn fetch(client: &Client, base_url: &str, params: &[(&str, &str)]) -> Result<Value, SearchError> {
    let response = client
        .get(base_url)
        .query(params)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "OMDb request failed");
        return Err(SearchError::Api {
            status: status.as_u16(),
            message: api_error_message(&error_text).unwrap_or(error_text),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SearchError::Parse(format!("invalid OMDb response: {}", e)))
}

/// OMDb puts a human-readable reason in `Error` (e.g. "Invalid API key!")
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("Error")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"Response":"False","Error":"Invalid API key!"}"#).as_deref(),
            Some("Invalid API key!")
        );
        assert_eq!(api_error_message("<html>502</html>"), None);
    }
}
