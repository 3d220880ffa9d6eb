//! Per-item enrichment: trailer search and subtitle probe
//!
//! The fetch functions run inside spawned tasks. They never fail: transport
//! errors are logged and reported as "nothing found", which is also the
//! default state of every item.

use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::api::EnrichmentTransport;
use crate::models::{ContentDetails, ContentInfo};

/// Which enrichments a gallery performs for its items
pub trait EnrichmentStrategy: Send + Sync + fmt::Debug {
    fn wants_trailer(&self, item: &ContentInfo) -> bool;
    fn wants_subtitles(&self, item: &ContentInfo) -> bool;
}

/// Movie galleries: trailer and subtitle badges
#[derive(Debug, Clone, Copy, Default)]
pub struct MovieEnrichment;

impl EnrichmentStrategy for MovieEnrichment {
    fn wants_trailer(&self, item: &ContentInfo) -> bool {
        matches!(item.details, ContentDetails::Movie(_))
    }

    fn wants_subtitles(&self, item: &ContentInfo) -> bool {
        matches!(item.details, ContentDetails::Movie(_))
    }
}

/// Galleries without enrichment (seasons)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl EnrichmentStrategy for NoEnrichment {
    fn wants_trailer(&self, _item: &ContentInfo) -> bool {
        false
    }

    fn wants_subtitles(&self, _item: &ContentInfo) -> bool {
        false
    }
}

/// Search terms for an item's trailer: `"<title> <year> trailer"`
pub fn trailer_query(item: &ContentInfo) -> String {
    let mut terms = vec![item.title.trim().to_string()];
    if let Some(year) = item.year() {
        terms.push(year.to_string());
    }
    terms.push("trailer".to_string());
    terms.join(" ")
}

/// Search for a trailer; `None` on a miss or any failure
pub async fn fetch_trailer(transport: &dyn EnrichmentTransport, query: &str) -> Option<String> {
    match transport.search_trailer(query).await {
        Ok(found) => found,
        Err(e) => {
            debug!(query, "trailer search failed: {}", e);
            None
        }
    }
}

/// Probe an item's streams for subtitles; `None` when there are none or the
/// request failed
pub async fn probe_subtitles(
    transport: &dyn EnrichmentTransport,
    item_id: &str,
) -> Option<BTreeSet<String>> {
    match transport.fetch_detail(item_id).await {
        Ok(detail) => {
            let languages = detail.subtitle_languages();
            (!languages.is_empty()).then_some(languages)
        }
        Err(e) => {
            debug!(item_id, "subtitle probe failed: {}", e);
            None
        }
    }
}
