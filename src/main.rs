//! EMTCT TUI - A terminal client for Belize's EMTCT clinical records service.
//!
//! This application provides a fast, keyboard-driven interface for looking up
//! maternal patients and browsing their pregnancy, lab, visit, and infant
//! follow-up records.

mod api;
mod app;
mod auth;
mod config;
mod fetch;
mod models;
mod ui;
mod utils;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber, writing to a daily-rotated log file.
/// Stderr belongs to the terminal UI, so logs go to disk only.
/// Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(log_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::daily(log_dir, "emtct.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut app = App::new()?;

    let log_dir = app.config.data_dir()?.join("logs");
    let _guard = init_tracing(&log_dir)?;
    info!("EMTCT TUI starting");

    // --login runs an interactive prompt before entering the TUI,
    // useful over SSH where the login overlay is awkward
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--login" {
        app.login_interactive().await?;
    }

    if !app.is_authenticated() {
        app.start_login();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("EMTCT TUI shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
