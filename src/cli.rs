//! CLI - Command Line Interface for postergrid
//!
//! `browse` opens the interactive poster gallery. The other subcommands run
//! the same gallery pipeline headless and print JSON for scripting.
//!
//! # Examples
//!
//! ```bash
//! # Open a library section in the terminal gallery
//! postergrid browse 1 --grid
//!
//! # List a section with trailer and subtitle enrichment
//! postergrid movies 1 --category unwatched --enrich --json
//!
//! # Seasons of a show
//! postergrid seasons 5123
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::gallery::{GalleryAdapter, PresentationMode, WatchIndicator};
use crate::models::{ContentDetails, ContentInfo, WatchState};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Requested item or section does not exist
    NotFound = 4,
    /// Listing loaded but had no usable items
    EmptyListing = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// postergrid - Poster gallery for a Plex library
#[derive(Parser, Debug)]
#[command(
    name = "postergrid",
    version,
    about = "Poster gallery for a Plex media library",
    long_about = "Browse movie and season posters from a Plex server with watch \
                  progress, trailer and subtitle badges.\n\n\
                  `browse` opens the interactive gallery.\n\
                  The other subcommands print listings for scripting.",
    after_help = "EXAMPLES:\n\
                  postergrid browse 1                  Open section 1\n\
                  postergrid browse --seasons 5123     Open a show's seasons\n\
                  postergrid movies 1 --enrich --json  List with enrichment\n\
                  postergrid trailer 42                Look up a stored trailer"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Plex server URL (overrides config and POSTERGRID_SERVER)
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    /// Plex token (overrides config and PLEX_TOKEN)
    #[arg(long, short = 't', global = true)]
    pub token: Option<String>,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if the command takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, Command::Browse(_))
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the movies of a library section
    #[command(visible_alias = "m")]
    Movies(MoviesCmd),

    /// List the seasons of a show
    #[command(visible_alias = "s")]
    Seasons(SeasonsCmd),

    /// Open the interactive poster gallery
    #[command(visible_alias = "b")]
    Browse(BrowseCmd),

    /// Look up the stored trailer of an item
    Trailer(TrailerCmd),
}

/// List a section's movies
#[derive(Args, Debug)]
pub struct MoviesCmd {
    /// Library section key
    #[arg(required = true)]
    pub section: String,

    /// Section category (all, unwatched, newest, ...)
    #[arg(long, default_value = "all")]
    pub category: String,

    /// Resolve trailers and subtitles for every movie
    #[arg(long, short = 'e')]
    pub enrich: bool,
}

/// List a show's seasons
#[derive(Args, Debug)]
pub struct SeasonsCmd {
    /// Rating key of the show
    #[arg(required = true)]
    pub show: String,
}

/// Open the gallery on a section or a show's seasons
#[derive(Args, Debug)]
pub struct BrowseCmd {
    /// Library section key
    #[arg(required_unless_present = "seasons", conflicts_with = "seasons")]
    pub section: Option<String>,

    /// Section category (all, unwatched, newest, ...)
    #[arg(long, default_value = "all")]
    pub category: String,

    /// Browse the seasons of this show instead of a section
    #[arg(long, value_name = "SHOW")]
    pub seasons: Option<String>,

    /// Start in grid presentation
    #[arg(long, short = 'g')]
    pub grid: bool,
}

impl BrowseCmd {
    /// `--grid` wins over the configured presentation
    pub fn presentation(&self, configured: PresentationMode) -> PresentationMode {
        if self.grid {
            PresentationMode::Grid
        } else {
            configured
        }
    }
}

/// Look up a trailer in the local metadata store
#[derive(Args, Debug)]
pub struct TrailerCmd {
    /// Rating key of the item
    #[arg(required = true)]
    pub item_id: String,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// A loaded listing as printed by `movies` and `seasons`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub item_count: usize,
    pub items: Vec<ItemOutput>,
}

impl ListingOutput {
    pub fn from_adapter(adapter: &GalleryAdapter) -> Self {
        Self {
            title: adapter.summary().and_then(|s| s.title.clone()),
            item_count: adapter.item_count(),
            items: adapter.items().iter().map(ItemOutput::from).collect(),
        }
    }
}

/// One poster in JSON form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutput {
    pub id: String,
    pub title: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    pub image_url: String,
    pub watch_state: WatchState,
    /// Progress bar percentage as displayed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Unwatched-episode badge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unwatched: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<String>,
}

impl From<&ContentInfo> for ItemOutput {
    fn from(item: &ContentInfo) -> Self {
        let (progress, unwatched) = match WatchIndicator::for_item(item) {
            WatchIndicator::InProgress(percent) => (Some(percent), None),
            WatchIndicator::Unwatched { badge } => (None, badge),
            WatchIndicator::Watched => (None, None),
        };
        let kind = match item.details {
            ContentDetails::Movie(_) => "movie",
            ContentDetails::Season(_) => "season",
        };

        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            kind: kind.to_string(),
            year: item.year(),
            image_url: item.image_url.clone(),
            watch_state: item.watch_state,
            progress,
            unwatched,
            trailer_id: item.enrichment.trailer_id.clone(),
            subtitles: item
                .enrichment
                .available_subtitles
                .iter()
                .flatten()
                .cloned()
                .collect(),
        }
    }
}

/// Result of `trailer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailerOutput {
    pub item_id: String,
    pub trailer_id: String,
    pub url: String,
}

impl TrailerOutput {
    pub fn new(item_id: impl Into<String>, trailer_id: impl Into<String>) -> Self {
        let trailer_id = trailer_id.into();
        Self {
            item_id: item_id.into(),
            url: format!("https://www.youtube.com/watch?v={}", trailer_id),
            trailer_id,
        }
    }
}

// =============================================================================
// Output Helper
// =============================================================================

/// Output helper for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a listing as a table, or JSON when requested
    pub fn print_listing(&self, listing: &ListingOutput) -> anyhow::Result<()> {
        if self.json {
            return self.print(listing);
        }

        if let Some(ref title) = listing.title {
            println!("{}", title);
        }
        for item in &listing.items {
            println!("{}", format_item_line(item));
        }
        if !self.quiet {
            println!("{} item(s)", listing.item_count);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

/// `id  title (year)  state  [badges]`
pub fn format_item_line(item: &ItemOutput) -> String {
    let year = item.year.map(|y| format!(" ({})", y)).unwrap_or_default();
    let state = match (item.progress, item.unwatched) {
        (Some(percent), _) => format!("{}%", percent),
        (None, Some(count)) => format!("{} unwatched", count),
        (None, None) if item.watch_state.is_watched() => "watched".to_string(),
        (None, None) => "-".to_string(),
    };

    let mut line = format!("{:>8}  {}{}  {}", item.id, item.title, year, state);
    if item.trailer_id.is_some() {
        line.push_str("  [trailer]");
    }
    if !item.subtitles.is_empty() {
        line.push_str(&format!("  [subs: {}]", item.subtitles.join(",")));
    }
    line
}

// =============================================================================
// Tests
// =============================================================================
