//! dashdeck - terminal dashboard
//!
//! ```sh
//! dashdeck --panel weather --city 臺中市 --cwa-key CWA-XXXX
//! dashdeck --panel stock --stock-code 2317 --log-file /tmp/dashdeck.log
//! ```

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dashdeck::action::Action;
use dashdeck::config::{AppConfig, Args};
use dashdeck::dispatch::{Runtime, Store};
use dashdeck::handler::EffectHandler;
use dashdeck::reducer::reducer;
use dashdeck::state::{AppState, LOADING_ANIM_TICK_MS};
use dashdeck::theme::{self, Theme};
use dashdeck::ui::DashboardUi;
use dashdeck_core::{Clients, JsonFileStore, KeyValueStore, MemoryStore, ReqwestTransport, Transport};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_key_store(path: Option<&Path>) -> Arc<dyn KeyValueStore> {
    let Some(path) = path else {
        tracing::warn!("no config directory, remembered keys last for this session only");
        return Arc::new(MemoryStore::new());
    };
    match JsonFileStore::open(path) {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "key store opened");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "key store unavailable, using memory");
            Arc::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::from_args(Args::parse());

    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }
    theme::install(if std::env::var_os("NO_COLOR").is_some() {
        Theme::MONOCHROME
    } else {
        Theme::DEFAULT
    });

    let transport: Arc<dyn Transport> = match ReqwestTransport::new(config.timeout) {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            eprintln!("Error: could not build the HTTP client: {e}");
            std::process::exit(1);
        }
    };
    let clients = Arc::new(Clients::new(&config.endpoints, transport));
    let store = open_key_store(config.key_store_path.as_deref());

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, clients, store).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: AppConfig,
    clients: Arc<Clients>,
    key_store: Arc<dyn KeyValueStore>,
) -> io::Result<()> {
    let initial = config.defaults.initial_panel;
    let handler = EffectHandler::new(clients, key_store, config.defaults.no_such_city.clone());

    let mut runtime = Runtime::new(Store::new(AppState::new(config.defaults), reducer));

    // Spinner frames while a panel loads
    runtime.tick_every(Duration::from_millis(LOADING_ANIM_TICK_MS), || Action::Tick);

    runtime.enqueue(Action::PanelSelect(initial));
    tracing::info!(panel = ?initial, "dashdeck started");

    let ui = RefCell::new(DashboardUi::new());

    runtime
        .run(
            terminal,
            |frame, area, state| ui.borrow_mut().render(frame, area, state),
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            |effect, ctx| handler.handle(effect, ctx),
        )
        .await
}
