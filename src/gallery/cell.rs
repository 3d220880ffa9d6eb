//! Recyclable gallery cells
//!
//! Cells are owned by a [`CellPool`] inside the adapter and addressed by
//! [`CellId`]. Every bind bumps the cell's generation, which is what lets a
//! late enrichment result tell whether the cell still shows its item.

use std::fmt;

use super::layout::CellSize;
use super::progress::WatchIndicator;
use crate::models::ContentInfo;

/// Handle to a cell in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(usize);

impl CellId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

/// Visible indicator state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellIndicators {
    pub watched_overlay: bool,
    pub progress: Option<u8>,
    pub unwatched_badge: Option<u64>,
    /// Strip holding the trailer and subtitle badges
    pub info_strip: bool,
    pub trailer: bool,
    pub subtitles: bool,
}

/// One poster cell
#[derive(Debug, Clone, Default)]
pub struct Cell {
    generation: u64,
    item_id: Option<String>,
    pub title: String,
    pub poster_url: Option<String>,
    pub size: Option<CellSize>,
    indicators: CellIndicators,
}

impl Cell {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Id of the item currently bound
    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn indicators(&self) -> CellIndicators {
        self.indicators
    }

    /// Whether the cell still shows `item_id` from the bind at `generation`
    pub fn is_showing(&self, item_id: &str, generation: u64) -> bool {
        self.generation == generation && self.item_id.as_deref() == Some(item_id)
    }

    /// Hide every transient indicator and start a new binding generation
    pub(crate) fn reset(&mut self) -> u64 {
        self.indicators = CellIndicators::default();
        self.generation += 1;
        self.generation
    }

    pub(crate) fn populate(&mut self, item: &ContentInfo, size: CellSize) {
        self.item_id = Some(item.id.clone());
        self.title = item.title.clone();
        self.poster_url = Some(item.image_url.clone());
        self.size = Some(size);
    }

    pub(crate) fn show_watch(&mut self, indicator: WatchIndicator) {
        match indicator {
            WatchIndicator::Watched => {
                self.indicators.watched_overlay = true;
            }
            WatchIndicator::InProgress(percent) => {
                self.indicators.progress = Some(percent);
            }
            WatchIndicator::Unwatched { badge } => {
                self.indicators.unwatched_badge = badge;
            }
        }
    }

    pub(crate) fn show_trailer(&mut self) {
        self.indicators.info_strip = true;
        self.indicators.trailer = true;
    }

    pub(crate) fn show_subtitles(&mut self) {
        self.indicators.info_strip = true;
        self.indicators.subtitles = true;
    }
}

/// Owner of every cell the view system has inflated
#[derive(Debug, Default)]
pub struct CellPool {
    cells: Vec<Cell>,
}

impl CellPool {
    pub fn inflate(&mut self) -> CellId {
        self.cells.push(Cell::default());
        CellId(self.cells.len() - 1)
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id.0)
    }

    /// Cells currently bound to `item_id`
    pub(crate) fn showing_mut<'a>(
        &'a mut self,
        item_id: &'a str,
    ) -> impl Iterator<Item = &'a mut Cell> + 'a {
        self.cells
            .iter_mut()
            .filter(move |cell| cell.item_id() == Some(item_id))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieInfo, WatchState};

    #[test]
    fn test_reset_hides_indicators_and_bumps_generation() {
        let mut pool = CellPool::default();
        let id = pool.inflate();
        let cell = pool.get_mut(id).unwrap();

        cell.show_watch(WatchIndicator::Watched);
        cell.show_trailer();
        let before = cell.generation();

        let generation = cell.reset();
        assert_eq!(generation, before + 1);
        assert_eq!(cell.indicators(), CellIndicators::default());
    }

    #[test]
    fn test_is_showing_checks_item_and_generation() {
        let mut cell = Cell::default();
        let item = ContentInfo::movie("7", "Heat", "http://x", WatchState::Unwatched, MovieInfo::default());
        let generation = cell.reset();
        cell.populate(&item, CellSize::new(120, 180));

        assert!(cell.is_showing("7", generation));
        assert!(!cell.is_showing("8", generation));
        assert!(!cell.is_showing("7", generation + 1));
    }

    #[test]
    fn test_pool_ids_are_sequential() {
        let mut pool = CellPool::default();
        assert!(pool.is_empty());
        let a = pool.inflate();
        let b = pool.inflate();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(pool.len(), 2);
        assert_eq!(b.to_string(), "cell#1");
    }
}
