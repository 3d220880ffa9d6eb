//! Watch-progress indicator selection

use crate::models::{ContentInfo, WatchState};

/// Lowest percentage the progress bar ever shows, so it stays visible
pub const MIN_VISIBLE_PROGRESS: u8 = 10;

/// Displayed progress for `watched` out of `total`
pub fn progress_percent(watched: u64, total: u64) -> u8 {
    let raw = if total == 0 {
        0
    } else {
        (watched.saturating_mul(100) / total).min(100) as u8
    };
    raw.max(MIN_VISIBLE_PROGRESS)
}

/// The single watch indicator a cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchIndicator {
    /// Fully-watched overlay
    Watched,
    /// Progress bar at the given percentage
    InProgress(u8),
    /// Neither; seasons may carry an unwatched-episode badge
    Unwatched { badge: Option<u64> },
}

impl WatchIndicator {
    pub fn for_item(item: &ContentInfo) -> Self {
        match item.watch_state {
            WatchState::Watched => WatchIndicator::Watched,
            WatchState::PartiallyWatched { watched, total } => {
                WatchIndicator::InProgress(progress_percent(watched, total))
            }
            WatchState::Unwatched => WatchIndicator::Unwatched {
                badge: item.unwatched_count(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieInfo, SeasonInfo};

    #[test]
    fn test_progress_not_clamped_above_minimum() {
        assert_eq!(progress_percent(3, 10), 30);
    }

    #[test]
    fn test_progress_clamped_to_minimum() {
        assert_eq!(progress_percent(1, 50), MIN_VISIBLE_PROGRESS);
    }

    #[test]
    fn test_progress_degenerate_inputs() {
        assert_eq!(progress_percent(0, 0), MIN_VISIBLE_PROGRESS);
        assert_eq!(progress_percent(20, 10), 100);
    }

    #[test]
    fn test_indicator_selection() {
        let movie = |state| {
            ContentInfo::movie("1", "M", "http://x", state, MovieInfo::default())
        };
        assert_eq!(
            WatchIndicator::for_item(&movie(WatchState::Watched)),
            WatchIndicator::Watched
        );
        assert_eq!(
            WatchIndicator::for_item(&movie(WatchState::from_counts(3, 10))),
            WatchIndicator::InProgress(30)
        );
        assert_eq!(
            WatchIndicator::for_item(&movie(WatchState::Unwatched)),
            WatchIndicator::Unwatched { badge: None }
        );
    }

    #[test]
    fn test_unwatched_season_badge() {
        let season = ContentInfo::season(
            "1",
            "Season 1",
            "http://x",
            SeasonInfo {
                total_episodes: 10,
                watched_episodes: 0,
                ..SeasonInfo::default()
            },
        );
        assert_eq!(
            WatchIndicator::for_item(&season),
            WatchIndicator::Unwatched { badge: Some(10) }
        );
    }
}
