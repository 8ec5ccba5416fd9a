//! Tourmap - browse Fredericksburg, TX businesses from the terminal
//!
//! A terminal UI application that lists wineries, restaurants, shops, lodging
//! and attractions around Fredericksburg, with category tabs, search,
//! attribute filters, favorites and an itinerary. `--print` prints one page
//! of results instead.

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use tourmap::app::App;
use tourmap::cli::{Cli, StartupConfig};
use tourmap::config::Settings;
use tourmap::data::geo::{annotate_distances, annotate_visibility};
use tourmap::data::{ListingClient, RequestOptions};
use tourmap::events::EventBus;
use tourmap::pipeline::{paginate, PipelineState};
use tourmap::store::LocalStore;
use tourmap::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Fetches listings once and prints the requested page to stdout
async fn run_print(settings: &Settings, startup: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = ListingClient::new(&settings.api)?;
    let fetched = client
        .fetch_businesses(&settings.map.bounds, RequestOptions::default())
        .await?;

    let mut businesses = fetched.data;
    if let Some(location) = startup.user_location {
        annotate_distances(&mut businesses, &location);
    }
    annotate_visibility(&mut businesses, &settings.map.bounds);

    let page_size = settings.ui.results_per_page;
    let mut state = PipelineState::new(page_size);
    state.set_category(startup.category.unwrap_or_default());
    if let Some(search) = &startup.search {
        state.set_search(search.clone());
    }

    // Requested directly so an out-of-range page is reported, not clamped
    let page = paginate(&state.filtered(&businesses), startup.page, page_size);
    print!(
        "{}",
        ui::render_plain_page(&page, page_size, state.category(), fetched.stale)
    );
    Ok(())
}

/// Runs the interactive terminal UI until the user quits
async fn run_tui(settings: Settings, startup: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = Arc::new(ListingClient::new(&settings.api)?);
    let mut bus = EventBus::new();

    let store = LocalStore::new();
    if store.is_none() {
        warn!("No data directory available; favorites and itinerary will not be saved");
    }

    let mut app = App::new(settings.ui.results_per_page, settings.map.bounds)
        .with_store(store)
        .with_events(bus.sender());
    app.apply_startup_config(&startup);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Trigger initial data load
    bus.spawn_load(Arc::clone(&client), app.bounds, RequestOptions::default());

    // Main event loop
    loop {
        while let Some(directory_event) = bus.try_recv() {
            app.handle_event(directory_event);
        }

        if app.refresh_requested {
            app.refresh_requested = false;
            info!("Manual refresh requested");
            bus.spawn_load(Arc::clone(&client), app.bounds, RequestOptions::refresh());
        }

        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let settings = Settings::load(startup.config_path.as_deref())?;

    if startup.print {
        logging::init_stderr(&settings.logging.level);
        return run_print(&settings, &startup).await;
    }

    match logging::init_file(&settings.logging.level) {
        Ok(path) => info!(path = %path.display(), "Logging to file"),
        Err(e) => eprintln!("Warning: could not open log file: {}", e),
    }

    run_tui(settings, startup).await
}
