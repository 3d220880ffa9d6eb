//! App state and core application logic
//!
//! Owns the gallery adapter for the interactive session, tracks the
//! selection, and maps the visible window of positions onto recycled cells.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::ops::Range;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::gallery::{AdapterState, Cell, CellId, FocusTarget, GalleryAdapter, PresentationMode};
use crate::models::ContentInfo;
use crate::ui::host::HostSignal;

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection over the gallery positions
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected position
    pub selected: usize,
    /// First visible position
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move the selection by `delta`, stopping at either end
    pub fn move_by(&mut self, delta: isize) {
        if self.len == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, self.len as isize - 1) as usize;
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset so the selection is inside a window of `visible` items
    /// starting on a multiple of `stride`
    pub fn scroll_into_view(&mut self, visible: usize, stride: usize) {
        let stride = stride.max(1);
        let visible = visible.max(stride);
        self.offset -= self.offset % stride;

        if self.selected < self.offset {
            self.offset = self.selected - self.selected % stride;
        } else if self.selected >= self.offset + visible {
            let row_end = self.selected - self.selected % stride + stride;
            self.offset = row_end.saturating_sub(visible);
        }
    }

    /// Update length (e.g., when a new listing comes in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Viewport
// =============================================================================

/// How many cells fit on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub columns: usize,
    pub rows: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { columns: 1, rows: 1 }
    }
}

/// Window of positions currently bound to `App::slots`
#[derive(Debug, Clone, PartialEq, Eq)]
struct BoundWindow {
    positions: Range<usize>,
    presentation: PresentationMode,
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    pub adapter: GalleryAdapter,
    pub selection: ListState,
    /// Whether the app is running
    pub running: bool,
    pub loading: LoadingState,
    /// Container the adapter asked to focus
    pub focus: Option<FocusTarget>,
    viewport: Viewport,
    /// Slot `i` shows position `bound.positions.start + i`
    slots: Vec<CellId>,
    bound: Option<BoundWindow>,
    posters: HashMap<CellId, String>,
    signals: UnboundedReceiver<HostSignal>,
}

impl App {
    pub fn new(adapter: GalleryAdapter, signals: UnboundedReceiver<HostSignal>) -> Self {
        Self {
            adapter,
            selection: ListState::default(),
            running: true,
            loading: LoadingState::Idle,
            focus: None,
            viewport: Viewport::default(),
            slots: Vec::new(),
            bound: None,
            posters: HashMap::new(),
            signals,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport {
            columns: viewport.columns.max(1),
            rows: viewport.rows.max(1),
        };
    }

    /// Cells shown at once in the current presentation
    pub fn capacity(&self) -> usize {
        match self.adapter.presentation() {
            PresentationMode::Gallery => self.viewport.columns,
            PresentationMode::Grid => self.viewport.columns * self.viewport.rows,
        }
    }

    /// Selection step for up/down
    fn row_stride(&self) -> usize {
        match self.adapter.presentation() {
            PresentationMode::Gallery => 1,
            PresentationMode::Grid => self.viewport.columns,
        }
    }

    pub fn selected_item(&self) -> Option<&ContentInfo> {
        if self.adapter.item_count() == 0 {
            return None;
        }
        self.adapter.item_at(self.selection.selected as i64).ok()
    }

    /// Poster URL last handed to a cell
    pub fn poster(&self, cell: CellId) -> Option<&str> {
        self.posters.get(&cell).map(String::as_str)
    }

    /// Bound cells in display order with their positions
    pub fn visible_cells(&self) -> Vec<(usize, CellId, &Cell)> {
        let Some(ref bound) = self.bound else {
            return Vec::new();
        };
        bound
            .positions
            .clone()
            .zip(self.slots.iter())
            .filter_map(|(position, &id)| self.adapter.cell(id).map(|cell| (position, id, cell)))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Apply finished fetches and view notifications, then rebind if needed
    pub fn tick(&mut self) {
        self.adapter.drain_pending();
        self.drain_signals();
        self.bind_visible();
        // Posters requested by the binds above
        self.drain_signals();
    }

    fn drain_signals(&mut self) {
        while let Ok(signal) = self.signals.try_recv() {
            match signal {
                HostSignal::DataChanged => {
                    self.selection.set_len(self.adapter.item_count());
                    self.bound = None;
                }
                HostSignal::Focus(target) => self.focus = Some(target),
                HostSignal::Loading(true) => {
                    self.loading =
                        LoadingState::Loading(Some(format!("Loading {}...", self.adapter.source())));
                }
                HostSignal::Loading(false) => self.loading = self.settled_loading_state(),
                HostSignal::Poster { cell, url } => {
                    self.posters.insert(cell, url);
                }
            }
        }
    }

    fn settled_loading_state(&self) -> LoadingState {
        match (self.adapter.state(), self.adapter.last_error()) {
            (AdapterState::Failed, Some(e)) => LoadingState::Error(e.to_string()),
            (AdapterState::Failed, None) => LoadingState::Error("Listing failed".to_string()),
            _ => LoadingState::Idle,
        }
    }

    /// Bind the visible window to the slot cells, reusing them in order
    fn bind_visible(&mut self) {
        let count = self.adapter.item_count();
        let capacity = self.capacity();
        let stride = self.row_stride();
        self.selection.scroll_into_view(capacity, stride);

        let start = self.selection.offset.min(count);
        let window = BoundWindow {
            positions: start..(start + capacity).min(count),
            presentation: self.adapter.presentation(),
        };
        if self.bound.as_ref() == Some(&window) {
            return;
        }

        for (slot, position) in window.positions.clone().enumerate() {
            let recycled = self.slots.get(slot).copied();
            match self.adapter.bind_cell(position as i64, recycled) {
                Ok(id) if slot < self.slots.len() => self.slots[slot] = id,
                Ok(id) => self.slots.push(id),
                Err(e) => {
                    debug!(position, "bind failed: {}", e);
                    break;
                }
            }
        }
        self.bound = Some(window);
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        let stride = self.row_stride() as isize;
        let page = self.capacity() as isize;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Left | KeyCode::Char('h') => self.selection.move_by(-1),
            KeyCode::Right | KeyCode::Char('l') => self.selection.move_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.selection.move_by(-stride),
            KeyCode::Down | KeyCode::Char('j') => self.selection.move_by(stride),
            KeyCode::PageUp => self.selection.move_by(-page),
            KeyCode::PageDown => self.selection.move_by(page),
            KeyCode::Home => self.selection.first(),
            KeyCode::End => self.selection.last(),
            KeyCode::Char('g') => {
                let next = self.adapter.presentation().toggled();
                self.adapter.set_presentation(next);
            }
            KeyCode::Char('r') => self.adapter.refresh(),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
