//! Data structures for postergrid
//!
//! Shared models used across the gallery pipeline:
//! - **Content**: movie and season records built from a listing
//! - **Watch state**: unwatched / partially watched / watched
//! - **Enrichment**: trailer and subtitle data discovered after the listing

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Watch State
// =============================================================================

/// How much of an item has been watched.
///
/// `PartiallyWatched` always holds `0 < watched < total`; build values through
/// [`WatchState::from_counts`] to keep that true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WatchState {
    #[default]
    Unwatched,
    PartiallyWatched { watched: u64, total: u64 },
    Watched,
}

impl WatchState {
    /// Normalise a `(watched, total)` pair into a watch state
    pub fn from_counts(watched: u64, total: u64) -> Self {
        if total == 0 || watched == 0 {
            WatchState::Unwatched
        } else if watched >= total {
            WatchState::Watched
        } else {
            WatchState::PartiallyWatched { watched, total }
        }
    }

    pub fn is_watched(&self) -> bool {
        matches!(self, WatchState::Watched)
    }

    pub fn is_partially_watched(&self) -> bool {
        matches!(self, WatchState::PartiallyWatched { .. })
    }
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchState::Unwatched => write!(f, "Unwatched"),
            WatchState::PartiallyWatched { watched, total } => {
                write!(f, "In progress ({}/{})", watched, total)
            }
            WatchState::Watched => write!(f, "Watched"),
        }
    }
}

// =============================================================================
// Content Variants
// =============================================================================

/// Movie-specific listing data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub year: Option<u16>,
    pub summary: String,
    pub studio: Option<String>,
    pub content_rating: Option<String>,
    /// Runtime in milliseconds
    pub duration_ms: Option<u64>,
}

/// Season-specific listing data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonInfo {
    /// Title of the show this season belongs to
    pub parent_title: Option<String>,
    pub index: Option<u32>,
    pub total_episodes: u64,
    pub watched_episodes: u64,
}

impl SeasonInfo {
    pub fn unwatched_episodes(&self) -> u64 {
        self.total_episodes.saturating_sub(self.watched_episodes)
    }
}

/// Variant payload of a [`ContentInfo`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentDetails {
    Movie(MovieInfo),
    Season(SeasonInfo),
}

// =============================================================================
// Enrichment
// =============================================================================

/// Data attached to an item after the listing arrived.
///
/// The `*_checked` flags record that a lookup was already issued for this
/// record so rebinding the same record never fetches twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub has_trailer: bool,
    pub trailer_id: Option<String>,
    pub available_subtitles: Option<BTreeSet<String>>,
    #[serde(skip)]
    pub trailer_checked: bool,
    #[serde(skip)]
    pub subtitles_checked: bool,
}

impl Enrichment {
    pub fn set_trailer(&mut self, trailer_id: impl Into<String>) {
        self.has_trailer = true;
        self.trailer_id = Some(trailer_id.into());
    }

    pub fn has_subtitles(&self) -> bool {
        self.available_subtitles
            .as_ref()
            .map(|langs| !langs.is_empty())
            .unwrap_or(false)
    }
}

// =============================================================================
// ContentInfo
// =============================================================================

/// One poster in a gallery: a movie or a TV season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentInfo {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub watch_state: WatchState,
    pub details: ContentDetails,
    pub enrichment: Enrichment,
}

impl ContentInfo {
    pub fn movie(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        watch_state: WatchState,
        info: MovieInfo,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            watch_state,
            details: ContentDetails::Movie(info),
            enrichment: Enrichment::default(),
        }
    }

    pub fn season(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        info: SeasonInfo,
    ) -> Self {
        let watch_state = WatchState::from_counts(info.watched_episodes, info.total_episodes);
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            watch_state,
            details: ContentDetails::Season(info),
            enrichment: Enrichment::default(),
        }
    }

    pub fn year(&self) -> Option<u16> {
        match &self.details {
            ContentDetails::Movie(movie) => movie.year,
            ContentDetails::Season(_) => None,
        }
    }

    pub fn parent_title(&self) -> Option<&str> {
        match &self.details {
            ContentDetails::Season(season) => season.parent_title.as_deref(),
            ContentDetails::Movie(_) => None,
        }
    }

    /// Unwatched episode count shown as a badge on season posters
    pub fn unwatched_count(&self) -> Option<u64> {
        match &self.details {
            ContentDetails::Season(season) if season.unwatched_episodes() > 0 => {
                Some(season.unwatched_episodes())
            }
            _ => None,
        }
    }
}

impl fmt::Display for ContentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.watch_state)
    }
}

// =============================================================================
// Poster Capability
// =============================================================================

/// What a gallery cell needs from an item
pub trait Poster {
    fn id(&self) -> &str;
    fn display_title(&self) -> &str;
    fn image_url(&self) -> &str;
    fn watch_state(&self) -> WatchState;
}

impl Poster for ContentInfo {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_title(&self) -> &str {
        &self.title
    }

    fn image_url(&self) -> &str {
        &self.image_url
    }

    fn watch_state(&self) -> WatchState {
        self.watch_state
    }
}

// =============================================================================
// Tests
// =============================================================================
