//! Terminal side of the adapter's view collaborators
//!
//! The adapter owns its `ViewSystem` and `ImageLoader`, so the terminal
//! implementations only forward what they are told over a channel. The app
//! drains that channel once per tick.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use crate::gallery::{CellId, FocusTarget, ImageLoader, ViewSystem};

/// Notification forwarded from the adapter to the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal {
    DataChanged,
    Focus(FocusTarget),
    Loading(bool),
    Poster { cell: CellId, url: String },
}

/// [`ViewSystem`] for the terminal gallery
#[derive(Debug, Clone)]
pub struct TerminalView {
    tx: UnboundedSender<HostSignal>,
}

/// [`ImageLoader`] for the terminal gallery; records which poster each cell shows
#[derive(Debug, Clone)]
pub struct TerminalImages {
    tx: UnboundedSender<HostSignal>,
}

/// Create the view collaborators and the receiver the app drains
pub fn channel() -> (TerminalView, TerminalImages, UnboundedReceiver<HostSignal>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        TerminalView { tx: tx.clone() },
        TerminalImages { tx },
        rx,
    )
}

fn forward(tx: &UnboundedSender<HostSignal>, signal: HostSignal) {
    if tx.send(signal).is_err() {
        trace!("app gone, dropping host signal");
    }
}

impl ViewSystem for TerminalView {
    fn notify_data_changed(&mut self) {
        forward(&self.tx, HostSignal::DataChanged);
    }

    fn request_focus(&mut self, target: FocusTarget) {
        forward(&self.tx, HostSignal::Focus(target));
    }

    fn set_loading(&mut self, loading: bool) {
        forward(&self.tx, HostSignal::Loading(loading));
    }
}

impl ImageLoader for TerminalImages {
    fn display(&mut self, url: &str, cell: CellId) {
        forward(
            &self.tx,
            HostSignal::Poster {
                cell,
                url: url.to_string(),
            },
        );
    }
}
