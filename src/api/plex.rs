//! Plex media server client
//!
//! Talks to the server's JSON API (`Accept: application/json`) and
//! authenticates with an optional `X-Plex-Token`.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::types::{MediaContainer, MediaContainerResponse};
use super::{ListingTransport, TransportError};
use crate::transform::AssetResolver;

/// Plex REST client
#[derive(Debug, Clone)]
pub struct PlexClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl PlexClient {
    /// Create a client for the server at `base_url` (e.g. `http://10.0.0.2:32400`)
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolver turning server-relative poster paths into absolute URLs
    pub fn assets(&self) -> AssetResolver {
        AssetResolver::new(self.base_url.clone(), self.token.clone())
    }

    /// Path of a section listing
    pub fn sections_path(section_key: &str, category: &str) -> String {
        format!(
            "/library/sections/{}/{}",
            urlencoding::encode(section_key),
            urlencoding::encode(category)
        )
    }

    /// Path of a show's season listing
    pub fn seasons_path(show_key: &str) -> String {
        format!("/library/metadata/{}/children", urlencoding::encode(show_key))
    }

    /// Path of one item's full metadata
    pub fn metadata_path(item_id: &str) -> String {
        format!("/library/metadata/{}", urlencoding::encode(item_id))
    }

    /// GET a path and parse the `MediaContainer` envelope
    async fn get(&self, path: &str) -> Result<MediaContainer, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "plex request");

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(ref token) = self.token {
            request = request.header("X-Plex-Token", token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::from_status(status));
        }

        let body = response.text().await?;
        let parsed: MediaContainerResponse = serde_json::from_str(&body)
            .map_err(|e| TransportError::InvalidResponse(format!("JSON parse error: {}", e)))?;
        Ok(parsed.media_container)
    }

    /// Full metadata for one item
    pub async fn metadata(&self, item_id: &str) -> Result<MediaContainer, TransportError> {
        self.get(&Self::metadata_path(item_id)).await
    }
}

#[async_trait]
impl ListingTransport for PlexClient {
    async fn get_listing(
        &self,
        section_key: &str,
        category: &str,
    ) -> Result<MediaContainer, TransportError> {
        self.get(&Self::sections_path(section_key, category)).await
    }

    async fn get_seasons_listing(&self, show_key: &str) -> Result<MediaContainer, TransportError> {
        self.get(&Self::seasons_path(show_key)).await
    }
}
