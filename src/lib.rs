//! postergrid - Poster gallery for a Plex media library
//!
//! Loads a section or a show's seasons, turns the listing into poster
//! records, and keeps recyclable cells in sync with watch progress and
//! per-item trailer and subtitle lookups.
//!
//! # Modules
//!
//! - `api` - Plex and YouTube clients behind transport traits
//! - `transform` - listing payload to poster records
//! - `gallery` - the adapter, cells, layout and watch indicators
//! - `enrichment` - trailer search and subtitle probe
//! - `store` - local SQLite trailer cache
//! - `app` / `ui` - terminal front end

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod enrichment;
pub mod gallery;
pub mod models;
pub mod store;
pub mod transform;
pub mod ui;

// Re-export commonly used types
pub use models::{ContentDetails, ContentInfo, Enrichment, MovieInfo, Poster, SeasonInfo, WatchState};

pub use api::{MediaServices, PlexClient, TransportError, YouTubeClient};
pub use app::App;
pub use config::Config;
pub use gallery::{
    AdapterState, GalleryAdapter, GalleryDeps, GalleryError, GalleryEvent, ListingSource,
    PresentationMode, SizeClass,
};
pub use store::MetadataStore;
