//! Host-side collaborators the adapter talks to

use super::cell::CellId;

/// Container that should take focus after a listing loads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    PosterGallery,
    PosterGrid,
    SeasonGallery,
}

/// Notifications from the adapter to whatever renders it
pub trait ViewSystem: Send {
    /// The item sequence changed; visible cells must be rebound
    fn notify_data_changed(&mut self);

    fn request_focus(&mut self, target: FocusTarget);

    /// Show or hide the loading indicator
    fn set_loading(&mut self, loading: bool);
}

/// Fire-and-forget poster loading
pub trait ImageLoader: Send {
    fn display(&mut self, url: &str, cell: CellId);
}
