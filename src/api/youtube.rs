//! YouTube Data API trailer search
//!
//! Only the first `video` hit is used. Without an API key the client reports
//! itself unconfigured and never issues requests.

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::TransportError;

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Trailer search client
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    #[serde(default)]
    video_id: Option<String>,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, YOUTUBE_API_BASE)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for a trailer and return the first video id
    pub async fn search_trailer(&self, query: &str) -> Result<Option<String>, TransportError> {
        let Some(ref api_key) = self.api_key else {
            return Ok(None);
        };

        let url = format!(
            "{}/search?part=snippet&type=video&maxResults=1&q={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(api_key)
        );
        debug!(query, "trailer search");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::from_status(status));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        Ok(parsed.items.into_iter().find_map(|item| item.id.video_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_unconfigured() {
        assert!(!YouTubeClient::new(None).is_configured());
        assert!(!YouTubeClient::new(Some(String::new())).is_configured());
        assert!(YouTubeClient::new(Some("key".into())).is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_search_returns_none() {
        let client = YouTubeClient::with_base_url(None, "http://127.0.0.1:1");
        assert_eq!(client.search_trailer("Alien 1979 trailer").await.unwrap(), None);
    }
}
