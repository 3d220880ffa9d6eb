//! postergrid - Poster gallery for a Plex media library
//!
//! # Usage
//!
//! ```bash
//! # Interactive gallery
//! postergrid browse 1
//! postergrid browse --seasons 5123 --grid
//!
//! # Scriptable listings
//! postergrid movies 1 --enrich --json
//! postergrid trailer 42
//! ```

use std::fs::OpenOptions;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use postergrid::cli::{BrowseCmd, Cli, Command, ExitCode, Output};
use postergrid::commands;
use postergrid::enrichment::{EnrichmentStrategy, MovieEnrichment, NoEnrichment};
use postergrid::ui;
use postergrid::{App, Config, GalleryAdapter, ListingSource};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

const DEFAULT_LOG_FILTER: &str = "postergrid=info";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.is_interactive())?;

    let config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    }
    .with_env_overrides()
    .with_flags(cli.server.clone(), cli.token.clone());
    info!(server = config.server_url(), "starting");

    let output = Output::new(&cli);
    let exit_code = match cli.command {
        Command::Movies(cmd) => commands::movies_cmd(cmd, &config, &output).await,
        Command::Seasons(cmd) => commands::seasons_cmd(cmd, &config, &output).await,
        Command::Trailer(cmd) => commands::trailer_cmd(cmd, &config, &output),
        Command::Browse(cmd) => match run_tui(cmd, &config).await {
            Ok(()) => ExitCode::Success,
            Err(e) => output.error(format!("{:#}", e), ExitCode::Error),
        },
    };
    std::process::exit(exit_code.into());
}

// =============================================================================
// Logging
// =============================================================================

/// `~/.cache/postergrid/postergrid.log`
fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("postergrid").join("postergrid.log"))
}

/// Log to stderr, or to a file while the TUI owns the terminal
fn init_logging(to_file: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if !to_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    match log_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the interactive gallery
async fn run_tui(cmd: BrowseCmd, config: &Config) -> Result<()> {
    let presentation = cmd.presentation(config.presentation());
    let (source, strategy): (ListingSource, Box<dyn EnrichmentStrategy>) =
        match (cmd.seasons, cmd.section) {
            (Some(show), _) => (ListingSource::seasons(show), Box::new(NoEnrichment)),
            (None, Some(section)) => (
                ListingSource::section(section, cmd.category),
                Box::new(MovieEnrichment),
            ),
            (None, None) => anyhow::bail!("browse needs a section or --seasons <SHOW>"),
        };

    let (view, images, signals) = ui::host::channel();
    let deps = commands::gallery_deps(config, Box::new(view), Box::new(images));
    let mut adapter = GalleryAdapter::new(source, strategy, deps)
        .with_presentation(presentation)
        .with_size_class(config.size_class());
    adapter.refresh();
    let mut app = App::new(adapter, signals);

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - applies finished fetches, renders, handles input
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        let size = terminal.size()?;
        app.set_viewport(ui::gallery::viewport(
            size.width,
            size.height,
            app.adapter.cell_size(),
        ));
        app.tick();

        terminal.draw(|frame| ui::gallery::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}
