//! Poster gallery adapter
//!
//! Owns the item sequence for one listing and binds it to recyclable cells.
//! All network work runs in spawned tasks that report back through a channel
//! as [`GalleryEvent`]s; the owner of the adapter applies them on its own
//! task, so the adapter state needs no locking.
//!
//! Lifecycle: `Idle → Loading → {Populated, Failed}`. A `refresh()` while a
//! listing is still loading supersedes it: the old task is aborted and any
//! result it already sent is discarded by request id.

pub mod cell;
pub mod layout;
pub mod progress;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use cell::{Cell, CellId, CellIndicators, CellPool};
pub use layout::{CellSize, LayoutTable, PresentationMode, SizeClass};
pub use progress::{progress_percent, WatchIndicator, MIN_VISIBLE_PROGRESS};
pub use view::{FocusTarget, ImageLoader, ViewSystem};

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{EnrichmentTransport, ListingTransport, MediaContainer, TransportError};
use crate::enrichment::{self, EnrichmentStrategy};
use crate::models::ContentInfo;
use crate::store::TrailerLookup;
use crate::transform::{self, AssetResolver};

// =============================================================================
// Errors and State
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    /// No items yet; check `item_count()` before asking for positions
    #[error("gallery has no items")]
    EmptyState,

    #[error("unknown cell {0}")]
    UnknownCell(CellId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdapterState {
    #[default]
    Idle,
    Loading,
    Populated,
    Failed,
}

// =============================================================================
// Listing Source
// =============================================================================

/// What the gallery lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    /// A library section filtered by category (`all`, `unwatched`, ...)
    Section { key: String, category: String },
    /// The seasons of one show
    Seasons { show_key: String },
}

impl ListingSource {
    pub fn section(key: impl Into<String>, category: impl Into<String>) -> Self {
        ListingSource::Section {
            key: key.into(),
            category: category.into(),
        }
    }

    pub fn seasons(show_key: impl Into<String>) -> Self {
        ListingSource::Seasons {
            show_key: show_key.into(),
        }
    }

    async fn fetch(
        &self,
        transport: &dyn ListingTransport,
    ) -> Result<MediaContainer, TransportError> {
        match self {
            ListingSource::Section { key, category } => transport.get_listing(key, category).await,
            ListingSource::Seasons { show_key } => transport.get_seasons_listing(show_key).await,
        }
    }

    fn transform(&self, container: &MediaContainer, assets: &AssetResolver) -> Vec<ContentInfo> {
        match self {
            ListingSource::Section { .. } => transform::movies(container, assets),
            ListingSource::Seasons { .. } => transform::seasons(container, assets),
        }
    }

    pub fn layout(&self) -> LayoutTable {
        match self {
            ListingSource::Section { .. } => LayoutTable::MOVIES,
            ListingSource::Seasons { .. } => LayoutTable::SEASONS,
        }
    }

    fn focus_target(&self, mode: PresentationMode) -> FocusTarget {
        match (self, mode) {
            (ListingSource::Seasons { .. }, _) => FocusTarget::SeasonGallery,
            (ListingSource::Section { .. }, PresentationMode::Gallery) => FocusTarget::PosterGallery,
            (ListingSource::Section { .. }, PresentationMode::Grid) => FocusTarget::PosterGrid,
        }
    }

    fn summary_title(&self, container: &MediaContainer, items: &[ContentInfo]) -> Option<String> {
        match self {
            ListingSource::Section { .. } => container.title1.clone(),
            ListingSource::Seasons { .. } => container
                .parent_title
                .clone()
                .or_else(|| items.first().and_then(|i| i.parent_title().map(str::to_string))),
        }
    }
}

impl fmt::Display for ListingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingSource::Section { key, category } => write!(f, "section {}/{}", key, category),
            ListingSource::Seasons { show_key } => write!(f, "seasons of {}", show_key),
        }
    }
}

/// Header data for the loaded listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSummary {
    pub title: Option<String>,
    pub item_count: usize,
}

impl ListingSummary {
    pub fn item_count_label(&self) -> String {
        format!("{} item(s)", self.item_count)
    }
}

impl fmt::Display for ListingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.title {
            Some(ref title) => write!(f, "{} · {}", title, self.item_count_label()),
            None => write!(f, "{}", self.item_count_label()),
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// Identity an enrichment result must still match to touch a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentTarget {
    /// Listing request that produced the item
    pub epoch: u64,
    pub item_id: String,
    pub cell: CellId,
    /// Cell generation at bind time
    pub generation: u64,
}

/// Completion of an asynchronous fetch
#[derive(Debug)]
pub enum GalleryEvent {
    ListingLoaded {
        request: u64,
        result: Result<MediaContainer, TransportError>,
    },
    TrailerResolved {
        target: EnrichmentTarget,
        trailer_id: Option<String>,
    },
    SubtitlesResolved {
        target: EnrichmentTarget,
        languages: Option<BTreeSet<String>>,
    },
}

// =============================================================================
// Adapter
// =============================================================================

/// Collaborators injected into the adapter
pub struct GalleryDeps {
    pub listing: Arc<dyn ListingTransport>,
    pub enrichment: Arc<dyn EnrichmentTransport>,
    pub trailers: Arc<dyn TrailerLookup>,
    pub images: Box<dyn ImageLoader>,
    pub view: Box<dyn ViewSystem>,
    pub assets: AssetResolver,
}

pub struct GalleryAdapter {
    source: ListingSource,
    strategy: Box<dyn EnrichmentStrategy>,
    listing_transport: Arc<dyn ListingTransport>,
    enrichment_transport: Arc<dyn EnrichmentTransport>,
    trailers: Arc<dyn TrailerLookup>,
    images: Box<dyn ImageLoader>,
    view: Box<dyn ViewSystem>,
    assets: AssetResolver,
    layout: LayoutTable,
    presentation: PresentationMode,
    size_class: SizeClass,
    state: AdapterState,
    items: Vec<ContentInfo>,
    summary: Option<ListingSummary>,
    /// Request id whose listing produced `items`
    epoch: u64,
    current_request: u64,
    listing_task: Option<JoinHandle<()>>,
    last_error: Option<TransportError>,
    enrichment_tasks: Vec<JoinHandle<()>>,
    /// Enrichment results still expected for the current epoch
    in_flight: usize,
    cells: CellPool,
    events_tx: UnboundedSender<GalleryEvent>,
    events_rx: UnboundedReceiver<GalleryEvent>,
}

impl GalleryAdapter {
    /// Create an idle adapter; call [`refresh`](Self::refresh) to load
    pub fn new(
        source: ListingSource,
        strategy: Box<dyn EnrichmentStrategy>,
        deps: GalleryDeps,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            layout: source.layout(),
            source,
            strategy,
            listing_transport: deps.listing,
            enrichment_transport: deps.enrichment,
            trailers: deps.trailers,
            images: deps.images,
            view: deps.view,
            assets: deps.assets,
            presentation: PresentationMode::default(),
            size_class: SizeClass::default(),
            state: AdapterState::Idle,
            items: Vec::new(),
            summary: None,
            epoch: 0,
            current_request: 0,
            listing_task: None,
            last_error: None,
            enrichment_tasks: Vec::new(),
            in_flight: 0,
            cells: CellPool::default(),
            events_tx,
            events_rx,
        }
    }

    pub fn with_presentation(mut self, presentation: PresentationMode) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn with_size_class(mut self, size_class: SizeClass) -> Self {
        self.size_class = size_class;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn source(&self) -> &ListingSource {
        &self.source
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == AdapterState::Loading
    }

    /// Error of the most recent failed refresh
    pub fn last_error(&self) -> Option<&TransportError> {
        self.last_error.as_ref()
    }

    /// Number of enrichment fetches whose results have not been applied
    pub fn pending_enrichment(&self) -> usize {
        self.in_flight
    }

    pub fn presentation(&self) -> PresentationMode {
        self.presentation
    }

    /// Switch presentation; visible cells must be rebound afterwards
    pub fn set_presentation(&mut self, presentation: PresentationMode) {
        if self.presentation != presentation {
            self.presentation = presentation;
            self.view.notify_data_changed();
        }
    }

    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    pub fn cell_size(&self) -> CellSize {
        self.layout.size(self.presentation, self.size_class)
    }

    pub fn summary(&self) -> Option<&ListingSummary> {
        self.summary.as_ref()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[ContentInfo] {
        &self.items
    }

    /// Item at `position`, clamped into the valid range
    pub fn item_at(&self, position: i64) -> Result<&ContentInfo, GalleryError> {
        let index = self.clamp(position)?;
        Ok(&self.items[index])
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn cells(&self) -> &CellPool {
        &self.cells
    }

    fn clamp(&self, position: i64) -> Result<usize, GalleryError> {
        let count = self.items.len();
        if count == 0 {
            return Err(GalleryError::EmptyState);
        }
        Ok(position.clamp(0, count as i64 - 1) as usize)
    }

    // -------------------------------------------------------------------------
    // Listing
    // -------------------------------------------------------------------------

    /// Start a listing fetch, superseding any fetch still in flight
    pub fn refresh(&mut self) {
        if let Some(task) = self.listing_task.take() {
            if !task.is_finished() {
                debug!(request = self.current_request, "superseding in-flight listing");
                task.abort();
            }
        }

        self.current_request += 1;
        let request = self.current_request;
        self.state = AdapterState::Loading;
        self.view.set_loading(true);
        info!(source = %self.source, request, "loading listing");

        let transport = Arc::clone(&self.listing_transport);
        let source = self.source.clone();
        let tx = self.events_tx.clone();
        self.listing_task = Some(tokio::spawn(async move {
            let result = source.fetch(transport.as_ref()).await;
            let _ = tx.send(GalleryEvent::ListingLoaded { request, result });
        }));
    }

    fn on_listing(&mut self, request: u64, result: Result<MediaContainer, TransportError>) {
        if request != self.current_request {
            debug!(
                request,
                current = self.current_request,
                "dropping superseded listing"
            );
            return;
        }
        self.listing_task = None;

        match result {
            Ok(container) => {
                let items = self.source.transform(&container, &self.assets);
                let skipped = container.metadata.len().saturating_sub(items.len());

                // Results for the old sequence can no longer land anywhere
                for task in self.enrichment_tasks.drain(..) {
                    task.abort();
                }
                self.in_flight = 0;
                self.last_error = None;

                self.summary = Some(ListingSummary {
                    title: self.source.summary_title(&container, &items),
                    item_count: items.len(),
                });
                self.items = items;
                self.epoch = request;
                self.state = AdapterState::Populated;
                info!(
                    source = %self.source,
                    items = self.items.len(),
                    skipped,
                    "listing loaded"
                );

                self.view.set_loading(false);
                self.view.notify_data_changed();
                self.view
                    .request_focus(self.source.focus_target(self.presentation));
            }
            Err(e) => {
                warn!(source = %self.source, "listing fetch failed: {}", e);
                self.state = AdapterState::Failed;
                self.last_error = Some(e);
                self.view.set_loading(false);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Binding
    // -------------------------------------------------------------------------

    /// Populate a cell for `position`, reusing `recycled` when given
    pub fn bind_cell(
        &mut self,
        position: i64,
        recycled: Option<CellId>,
    ) -> Result<CellId, GalleryError> {
        let index = self.clamp(position)?;
        let cell_id = match recycled {
            Some(id) if self.cells.get(id).is_some() => id,
            Some(id) => return Err(GalleryError::UnknownCell(id)),
            None => self.cells.inflate(),
        };
        let size = self.cell_size();

        let cell = self
            .cells
            .get_mut(cell_id)
            .ok_or(GalleryError::UnknownCell(cell_id))?;
        let generation = cell.reset();
        cell.populate(&self.items[index], size);

        if self.presentation == PresentationMode::Grid {
            self.enrich(index, cell_id, generation);
        }

        let item = &self.items[index];
        self.images.display(&item.image_url, cell_id);
        let indicator = WatchIndicator::for_item(item);
        if let Some(cell) = self.cells.get_mut(cell_id) {
            cell.show_watch(indicator);
        }

        Ok(cell_id)
    }

    /// Show known enrichment on the cell and start fetches for what is missing
    fn enrich(&mut self, index: usize, cell_id: CellId, generation: u64) {
        let item = &mut self.items[index];
        let target = EnrichmentTarget {
            epoch: self.epoch,
            item_id: item.id.clone(),
            cell: cell_id,
            generation,
        };

        let mut show_trailer = false;
        let mut show_subtitles = false;
        let mut trailer_search = None;
        let mut subtitle_probe = false;

        if self.strategy.wants_trailer(item) {
            if !item.enrichment.trailer_checked {
                item.enrichment.trailer_checked = true;
                if let Some(trailer_id) = self.trailers.lookup_trailer(&item.id) {
                    item.enrichment.set_trailer(trailer_id);
                } else if self.enrichment_transport.trailers_available() {
                    trailer_search = Some(enrichment::trailer_query(item));
                }
            }
            show_trailer = item.enrichment.has_trailer;
        }

        if self.strategy.wants_subtitles(item) {
            if item.enrichment.has_subtitles() {
                show_subtitles = true;
            } else if !item.enrichment.subtitles_checked {
                item.enrichment.subtitles_checked = true;
                subtitle_probe = true;
            }
        }

        if let Some(cell) = self.cells.get_mut(cell_id) {
            if show_trailer {
                cell.show_trailer();
            }
            if show_subtitles {
                cell.show_subtitles();
            }
        }

        if let Some(query) = trailer_search {
            self.spawn_trailer_search(target.clone(), query);
        }
        if subtitle_probe {
            self.spawn_subtitle_probe(target);
        }
    }

    fn spawn_trailer_search(&mut self, target: EnrichmentTarget, query: String) {
        let transport = Arc::clone(&self.enrichment_transport);
        let tx = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            let trailer_id = guarded(async move {
                enrichment::fetch_trailer(transport.as_ref(), &query).await
            })
            .await;
            let _ = tx.send(GalleryEvent::TrailerResolved { target, trailer_id });
        });
        self.track(handle);
    }

    fn spawn_subtitle_probe(&mut self, target: EnrichmentTarget) {
        let transport = Arc::clone(&self.enrichment_transport);
        let tx = self.events_tx.clone();
        let item_id = target.item_id.clone();
        let handle = tokio::spawn(async move {
            let languages = guarded(async move {
                enrichment::probe_subtitles(transport.as_ref(), &item_id).await
            })
            .await;
            let _ = tx.send(GalleryEvent::SubtitlesResolved { target, languages });
        });
        self.track(handle);
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.enrichment_tasks.retain(|task| !task.is_finished());
        self.enrichment_tasks.push(handle);
        self.in_flight += 1;
    }

    // -------------------------------------------------------------------------
    // Event Handling
    // -------------------------------------------------------------------------

    /// Wait for the next completed fetch
    pub async fn next_event(&mut self) -> Option<GalleryEvent> {
        self.events_rx.recv().await
    }

    /// Apply every completion already queued, without waiting
    pub fn drain_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    pub fn apply(&mut self, event: GalleryEvent) {
        match event {
            GalleryEvent::ListingLoaded { request, result } => self.on_listing(request, result),
            GalleryEvent::TrailerResolved { target, trailer_id } => {
                self.settle(&target);
                self.on_trailer(target, trailer_id)
            }
            GalleryEvent::SubtitlesResolved { target, languages } => {
                self.settle(&target);
                self.on_subtitles(target, languages)
            }
        }
    }

    fn settle(&mut self, target: &EnrichmentTarget) {
        if target.epoch == self.epoch {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
    }

    fn target_item(&mut self, target: &EnrichmentTarget) -> Option<&mut ContentInfo> {
        if target.epoch != self.epoch {
            debug!(item_id = %target.item_id, "enrichment for a replaced listing");
            return None;
        }
        self.items.iter_mut().find(|item| item.id == target.item_id)
    }

    fn on_trailer(&mut self, target: EnrichmentTarget, trailer_id: Option<String>) {
        let Some(trailer_id) = trailer_id else {
            return;
        };
        let Some(item) = self.target_item(&target) else {
            return;
        };
        item.enrichment.set_trailer(trailer_id.as_str());
        self.trailers.remember_trailer(&target.item_id, &trailer_id);
        self.update_cell(&target, Cell::show_trailer);
    }

    fn on_subtitles(&mut self, target: EnrichmentTarget, languages: Option<BTreeSet<String>>) {
        let Some(languages) = languages else {
            return;
        };
        let Some(item) = self.target_item(&target) else {
            return;
        };
        item.enrichment.available_subtitles = Some(languages);
        self.update_cell(&target, Cell::show_subtitles);
    }

    /// Mark every cell that shows the target's item right now
    fn update_cell(&mut self, target: &EnrichmentTarget, update: fn(&mut Cell)) {
        if !self
            .cells
            .get(target.cell)
            .is_some_and(|cell| cell.is_showing(&target.item_id, target.generation))
        {
            debug!(
                cell = %target.cell,
                item_id = %target.item_id,
                "cell was rebound since the request, following the item"
            );
        }
        // Badges are only drawn in the grid
        if self.presentation != PresentationMode::Grid {
            return;
        }
        for cell in self.cells.showing_mut(&target.item_id) {
            update(cell);
        }
    }
}

/// Aborts the wrapped task when dropped
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run an enrichment fetch in its own task so the completion event is still
/// sent when the fetch panics; a panic reads as nothing found
async fn guarded<T, F>(work: F) -> Option<T>
where
    T: Send + 'static,
    F: Future<Output = Option<T>> + Send + 'static,
{
    let mut task = AbortOnDrop(tokio::spawn(work));
    match (&mut task.0).await {
        Ok(found) => found,
        Err(e) => {
            warn!("enrichment task failed: {}", e);
            None
        }
    }
}

impl fmt::Debug for GalleryAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalleryAdapter")
            .field("source", &self.source)
            .field("strategy", &self.strategy)
            .field("state", &self.state)
            .field("presentation", &self.presentation)
            .field("items", &self.items.len())
            .field("cells", &self.cells.len())
            .finish()
    }
}

impl Drop for GalleryAdapter {
    fn drop(&mut self) {
        if let Some(task) = self.listing_task.take() {
            task.abort();
        }
        for task in self.enrichment_tasks.drain(..) {
            task.abort();
        }
    }
}
