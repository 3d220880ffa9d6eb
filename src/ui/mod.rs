//! Terminal UI components
//!
//! Built with ratatui. The gallery screen draws whatever cells the adapter
//! has bound; `host` carries the adapter's view notifications to the app.

pub mod gallery;
pub mod host;
pub mod theme;

pub use theme::Theme;
