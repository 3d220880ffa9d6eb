//! API clients for the remote services
//!
//! - Plex: section/season listings and item detail
//! - YouTube: trailer search
//!
//! The gallery only sees the [`ListingTransport`] and [`EnrichmentTransport`]
//! traits; the concrete clients live in the submodules.

pub mod plex;
pub mod types;
pub mod youtube;

use async_trait::async_trait;
use thiserror::Error;

pub use plex::PlexClient;
pub use types::MediaContainer;
pub use youtube::YouTubeClient;

/// Failure of a listing or enrichment request
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Unauthorized ({0}), check the server token or API key")]
    Unauthorized(u16),

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl TransportError {
    /// Map a non-success HTTP status to an error
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            404 => TransportError::NotFound,
            code @ (401 | 403) => TransportError::Unauthorized(code),
            code => TransportError::ServerError(code),
        }
    }
}

/// Source of gallery listings
#[async_trait]
pub trait ListingTransport: Send + Sync {
    /// Items of a library section, e.g. `("1", "all")` or `("1", "unwatched")`
    async fn get_listing(
        &self,
        section_key: &str,
        category: &str,
    ) -> Result<MediaContainer, TransportError>;

    /// Seasons of one show
    async fn get_seasons_listing(&self, show_key: &str) -> Result<MediaContainer, TransportError>;
}

/// Source of per-item enrichment data
#[async_trait]
pub trait EnrichmentTransport: Send + Sync {
    /// Whether trailer search can be performed at all
    fn trailers_available(&self) -> bool;

    /// Search for a trailer, returning its video id when one is found
    async fn search_trailer(&self, query: &str) -> Result<Option<String>, TransportError>;

    /// Full metadata for one item, including its media streams
    async fn fetch_detail(&self, item_id: &str) -> Result<MediaContainer, TransportError>;
}

/// Plex detail lookups combined with YouTube trailer search
pub struct MediaServices {
    plex: PlexClient,
    youtube: YouTubeClient,
}

impl MediaServices {
    pub fn new(plex: PlexClient, youtube: YouTubeClient) -> Self {
        Self { plex, youtube }
    }
}

#[async_trait]
impl EnrichmentTransport for MediaServices {
    fn trailers_available(&self) -> bool {
        self.youtube.is_configured()
    }

    async fn search_trailer(&self, query: &str) -> Result<Option<String>, TransportError> {
        self.youtube.search_trailer(query).await
    }

    async fn fetch_detail(&self, item_id: &str) -> Result<MediaContainer, TransportError> {
        self.plex.metadata(item_id).await
    }
}
