//! `FlowLane`: terminal kanban board.
//!
//! Projects with To Do / In Progress / Done columns, saved after every
//! change. Configuration via CLI flags, environment variables, or config
//! file (`~/.config/flowlane/config.toml`).
//!
//! ```bash
//! # Board saved in the platform data directory
//! cargo run --bin flowlane
//!
//! # Board saved somewhere else, debug logging
//! cargo run --bin flowlane -- --data-dir ./boards --log-level debug
//!
//! # Throwaway board, nothing written
//! cargo run --bin flowlane -- --ephemeral
//! ```

use std::io;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use flowlane::app::App;
use flowlane::config::{CliArgs, ClientConfig};
use flowlane::ui;
use flowlane_core::storage::{KeyValueStorage, MemoryStorage};
use flowlane_core::store::ProjectStore;

fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("flowlane starting");

    let storage: Box<dyn KeyValueStorage> = match config.open_storage() {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("Warning: {e}; changes will not be saved");
            tracing::warn!(error = %e, "no board storage available, running in memory");
            Box::new(MemoryStorage::new())
        }
    };
    let mut app = App::new(ProjectStore::open(storage)).with_config(&config);

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &mut app, config.poll_timeout);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Last chance for a snapshot that failed to save earlier.
    if app.store.is_dirty()
        && let Err(e) = app.store.flush()
    {
        eprintln!("Warning: board could not be saved: {e}");
        tracing::error!(error = %e, "board could not be saved on exit");
    }

    tracing::info!("flowlane exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("flowlane.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poll_timeout: Duration,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            // Only handle key press events (ignore release/repeat on some platforms)
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key_event(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
