//! ruhestand - an offline-first countdown to retirement for the terminal.
//!
//! Renders the remaining time until a configured target date, persists
//! display preferences, and keeps the companion web shell cached for
//! offline use.

mod app;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ruhestand_core::cache::{AssetCache, CacheManifest, CacheProxy};
use ruhestand_core::settings;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a daily file under the cache directory; stderr belongs to
/// the TUI. Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = settings::cache_dir()?.join("logs");
    let appender = tracing_appender::rolling::daily(log_dir, "ruhestand.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

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

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--refresh-cache" {
        return refresh_cache().await;
    }

    let _guard = init_tracing()?;
    info!("ruhestand starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and warm the offline cache in the background
    let mut app = App::new()?;
    app.warm_cache_background();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("ruhestand shutting down");
    Ok(())
}

/// Install the manifest into the offline cache and purge stale versions,
/// without entering the TUI.
async fn refresh_cache() -> Result<()> {
    let manifest = CacheManifest::load_or_default()?;
    let cache = AssetCache::new(settings::cache_dir()?.join("assets"))?;
    let proxy = CacheProxy::new(cache, manifest)?;

    eprintln!(
        "Fetching {} assets into {} ...",
        proxy.manifest().assets.len(),
        proxy.manifest().namespace()
    );
    let report = proxy.install().await;
    for asset in &report.failed {
        eprintln!("  Warning: failed to fetch {}", asset);
    }
    let purged = proxy.activate()?;
    println!(
        "{} assets cached, {} stale namespaces purged",
        report.stored, purged
    );
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout so the countdown keeps ticking
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Advance the clock and pick up background cache results
        app.on_idle();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
