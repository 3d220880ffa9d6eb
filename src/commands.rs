//! CLI Command Handlers
//!
//! Each listing command runs a [`GalleryAdapter`] without a terminal: the
//! listing is loaded, every position is bound, and the handler waits for
//! enrichment before printing. Handlers take the resolved config and
//! `Output`, and return an `ExitCode`.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::trace;

use crate::api::{MediaServices, PlexClient, TransportError, YouTubeClient};
use crate::cli::{ExitCode, ListingOutput, MoviesCmd, Output, SeasonsCmd, TrailerCmd, TrailerOutput};
use crate::config::Config;
use crate::enrichment::{EnrichmentStrategy, MovieEnrichment, NoEnrichment};
use crate::gallery::{
    CellId, FocusTarget, GalleryAdapter, GalleryDeps, ImageLoader, ListingSource,
    PresentationMode, ViewSystem,
};
use crate::store::MetadataStore;

// =============================================================================
// Wiring
// =============================================================================

/// Trailer database for `config`, falling back to the working directory
pub fn metadata_store(config: &Config) -> MetadataStore {
    MetadataStore::new(
        config
            .metadata_db_path()
            .unwrap_or_else(|| PathBuf::from("metadata.db")),
    )
}

/// Real collaborators for an adapter, talking to the configured servers
pub fn gallery_deps(
    config: &Config,
    view: Box<dyn ViewSystem>,
    images: Box<dyn ImageLoader>,
) -> GalleryDeps {
    let plex = PlexClient::new(config.server_url(), config.plex_token.clone());
    let youtube = YouTubeClient::new(config.youtube_api_key.clone());
    let assets = plex.assets();

    GalleryDeps {
        listing: Arc::new(plex.clone()),
        enrichment: Arc::new(MediaServices::new(plex, youtube)),
        trailers: Arc::new(metadata_store(config)),
        images,
        view,
        assets,
    }
}

/// View host for command-line runs: nothing is drawn
#[derive(Debug, Default)]
pub struct HeadlessView;

impl ViewSystem for HeadlessView {
    fn notify_data_changed(&mut self) {
        trace!("data changed");
    }

    fn request_focus(&mut self, target: FocusTarget) {
        trace!(?target, "focus requested");
    }

    fn set_loading(&mut self, loading: bool) {
        trace!(loading, "loading indicator");
    }
}

impl ImageLoader for HeadlessView {
    fn display(&mut self, url: &str, cell: CellId) {
        trace!(%cell, url, "poster skipped");
    }
}

fn headless_adapter(
    config: &Config,
    source: ListingSource,
    strategy: Box<dyn EnrichmentStrategy>,
    presentation: PresentationMode,
) -> GalleryAdapter {
    let deps = gallery_deps(config, Box::new(HeadlessView), Box::new(HeadlessView));
    GalleryAdapter::new(source, strategy, deps)
        .with_presentation(presentation)
        .with_size_class(config.size_class())
}

/// Refresh and wait until the listing settles
pub async fn load_listing(adapter: &mut GalleryAdapter) {
    adapter.refresh();
    while adapter.is_loading() {
        match adapter.next_event().await {
            Some(event) => adapter.apply(event),
            None => break,
        }
    }
}

/// Bind every item once and wait for all enrichment results
pub async fn bind_all(adapter: &mut GalleryAdapter) {
    for position in 0..adapter.item_count() {
        if let Err(e) = adapter.bind_cell(position as i64, None) {
            trace!(position, "bind skipped: {}", e);
        }
    }
    while adapter.pending_enrichment() > 0 {
        match adapter.next_event().await {
            Some(event) => adapter.apply(event),
            None => break,
        }
    }
}

fn transport_exit_code(error: &TransportError) -> ExitCode {
    match error {
        TransportError::NotFound => ExitCode::NotFound,
        _ => ExitCode::NetworkError,
    }
}

/// Load `adapter`, optionally enrich it, and print the listing
pub async fn run_listing(adapter: &mut GalleryAdapter, enrich: bool, output: &Output) -> ExitCode {
    output.info(format!("Loading {}...", adapter.source()));
    load_listing(adapter).await;

    if let Some(e) = adapter.last_error() {
        return output.error(
            format!("Failed to load {}: {}", adapter.source(), e),
            transport_exit_code(e),
        );
    }
    if adapter.item_count() == 0 {
        return output.error(
            format!("No items in {}", adapter.source()),
            ExitCode::EmptyListing,
        );
    }

    if enrich {
        output.info(format!("Enriching {} item(s)...", adapter.item_count()));
        bind_all(adapter).await;
    }

    if let Err(e) = output.print_listing(&ListingOutput::from_adapter(adapter)) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Movies Command
// =============================================================================

pub async fn movies_cmd(cmd: MoviesCmd, config: &Config, output: &Output) -> ExitCode {
    // Enrichment only runs in grid presentation
    let presentation = if cmd.enrich {
        PresentationMode::Grid
    } else {
        PresentationMode::Gallery
    };
    let mut adapter = headless_adapter(
        config,
        ListingSource::section(cmd.section, cmd.category),
        Box::new(MovieEnrichment),
        presentation,
    );
    run_listing(&mut adapter, cmd.enrich, output).await
}

// =============================================================================
// Seasons Command
// =============================================================================

pub async fn seasons_cmd(cmd: SeasonsCmd, config: &Config, output: &Output) -> ExitCode {
    let mut adapter = headless_adapter(
        config,
        ListingSource::seasons(cmd.show),
        Box::new(NoEnrichment),
        PresentationMode::Gallery,
    );
    run_listing(&mut adapter, false, output).await
}

// =============================================================================
// Trailer Command
// =============================================================================

pub fn trailer_cmd(cmd: TrailerCmd, config: &Config, output: &Output) -> ExitCode {
    let store = metadata_store(config);
    match store.find_by_item_id(&cmd.item_id) {
        Ok(Some(record)) => {
            if let Err(e) = output.print(TrailerOutput::new(record.item_id, record.trailer_id)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Ok(None) => output.error(
            format!("No trailer stored for {}", cmd.item_id),
            ExitCode::NotFound,
        ),
        Err(e) => output.error(
            format!("Metadata store {}: {}", store.path().display(), e),
            ExitCode::Error,
        ),
    }
}
