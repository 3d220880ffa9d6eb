//! In-memory collaborators shared by the adapter and app tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::{EnrichmentTransport, ListingTransport, MediaContainer, TransportError};
use crate::store::TrailerLookup;

pub(crate) struct FakeListing {
    pub container: MediaContainer,
    pub fail: AtomicBool,
}

impl FakeListing {
    pub fn new(container: MediaContainer) -> Arc<Self> {
        Arc::new(Self {
            container,
            fail: AtomicBool::new(false),
        })
    }

    fn respond(&self) -> Result<MediaContainer, TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(TransportError::ServerError(500))
        } else {
            Ok(self.container.clone())
        }
    }
}

#[async_trait]
impl ListingTransport for FakeListing {
    async fn get_listing(&self, _: &str, _: &str) -> Result<MediaContainer, TransportError> {
        self.respond()
    }

    async fn get_seasons_listing(&self, _: &str) -> Result<MediaContainer, TransportError> {
        self.respond()
    }
}

/// Finds a trailer for "Alien" and English subtitles for item "1"
#[derive(Default)]
pub(crate) struct FakeEnrichment {
    pub searches: AtomicUsize,
    pub probes: AtomicUsize,
    /// Answer every request with a 503
    pub fail: AtomicBool,
    /// Panic inside every request
    pub panic: AtomicBool,
}

impl FakeEnrichment {
    fn check(&self) -> Result<(), TransportError> {
        if self.panic.load(Ordering::SeqCst) {
            panic!("enrichment transport blew up");
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::ServerError(503));
        }
        Ok(())
    }
}

#[async_trait]
impl EnrichmentTransport for FakeEnrichment {
    fn trailers_available(&self) -> bool {
        true
    }

    async fn search_trailer(&self, query: &str) -> Result<Option<String>, TransportError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(query.starts_with("Alien").then(|| "yt-alien".to_string()))
    }

    async fn fetch_detail(&self, item_id: &str) -> Result<MediaContainer, TransportError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if item_id != "1" {
            return Ok(MediaContainer::default());
        }
        Ok(serde_json::from_value(json!({
            "Metadata": [{
                "ratingKey": "1",
                "Media": [{"Part": [{"Stream": [
                    {"streamType": 3, "languageCode": "eng"}
                ]}]}]
            }]
        }))
        .unwrap())
    }
}

#[derive(Default)]
pub(crate) struct MemoryTrailers {
    known: Mutex<HashMap<String, String>>,
}

impl TrailerLookup for MemoryTrailers {
    fn lookup_trailer(&self, item_id: &str) -> Option<String> {
        self.known.lock().unwrap().get(item_id).cloned()
    }

    fn remember_trailer(&self, item_id: &str, trailer_id: &str) {
        self.known
            .lock()
            .unwrap()
            .insert(item_id.to_string(), trailer_id.to_string());
    }
}

pub(crate) fn movie_listing() -> MediaContainer {
    serde_json::from_value(json!({
        "title1": "Movies",
        "Metadata": [
            {"ratingKey": "1", "type": "movie", "title": "Alien", "year": 1979,
             "thumb": "/library/metadata/1/thumb", "viewCount": 1},
            {"ratingKey": "2", "type": "movie", "title": "No Poster"},
            {"ratingKey": "3", "type": "movie", "title": "Heat", "year": 1995,
             "thumb": "/library/metadata/3/thumb", "viewOffset": 30, "duration": 100}
        ]
    }))
    .unwrap()
}

pub(crate) fn season_listing() -> MediaContainer {
    serde_json::from_value(json!({
        "parentTitle": "The Wire",
        "Metadata": [
            {"ratingKey": "11", "type": "season", "title": "Season 1",
             "thumb": "/s1.jpg", "leafCount": 13, "viewedLeafCount": 13},
            {"ratingKey": "12", "type": "season", "title": "Season 2",
             "thumb": "/s2.jpg", "leafCount": 12, "viewedLeafCount": 0}
        ]
    }))
    .unwrap()
}
