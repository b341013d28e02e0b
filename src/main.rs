#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tracing::{info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use window_state_keeper::constants::{env, timing};
use window_state_keeper::x11::{self, X11Host, X11Window};
use window_state_keeper::{persistence, ManagedWindow, StoreConfig, WindowStateStore};

#[derive(Parser, Debug)]
#[command(name = "window-state-keeper", version, about = "Persist and restore X11 window geometry")]
struct Cli {
    /// JSON file with store options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State filename (default: window-state.json)
    #[arg(long, global = true)]
    file: Option<String>,

    /// Directory holding the state file (default: user config dir)
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Don't re-maximize a window that was saved maximized
    #[arg(long, global = true)]
    no_maximize: bool,

    /// Don't re-enter full-screen for a window saved full-screen
    #[arg(long, global = true)]
    no_full_screen: bool,

    #[arg(long, global = true)]
    default_width: Option<u32>,

    #[arg(long, global = true)]
    default_height: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved geometry and the persisted file
    Show,
    /// Restore an existing window's geometry and follow it until it closes
    Track {
        /// X11 window id (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_window_id)]
        window: u32,

        /// Follow the window without applying the saved geometry first
        #[arg(long)]
        no_restore: bool,
    },
}

impl Cli {
    /// Config file (if any) with command-line overrides applied
    fn store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => StoreConfig::load(path)?,
            None => StoreConfig::default(),
        };
        if let Some(file) = &self.file {
            config.file = file.clone();
        }
        if let Some(path) = &self.path {
            config.path = Some(path.clone());
        }
        if self.no_maximize {
            config.maximize = false;
        }
        if self.no_full_screen {
            config.full_screen = false;
        }
        if let Some(width) = self.default_width {
            config.default_width = width;
        }
        if let Some(height) = self.default_height {
            config.default_height = height;
        }
        Ok(config)
    }
}

fn parse_window_id(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid window id '{value}': {e}"))
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var(env::LOG_LEVEL)
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // stdout is reserved for command output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(unix)]
fn register_shutdown_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&flag))
            .context(format!("Failed to register handler for signal {}", signal))?;
    }
    Ok(flag)
}

#[cfg(not(unix))]
fn register_shutdown_flag() -> Result<Arc<AtomicBool>> {
    Ok(Arc::new(AtomicBool::new(false)))
}

fn show(config: StoreConfig) -> Result<()> {
    let (conn, screen_num) = x11::connect()?;
    let store = WindowStateStore::new(config, Rc::new(X11Host::new(conn, screen_num)));
    let path = store.file_path();

    let persisted = persistence::load_state(&path)
        .inspect_err(|e| warn!(error = %format!("{e:#}"), "No persisted state"))
        .ok();

    let report = serde_json::json!({
        "file": path,
        "resolved": store.state(),
        "persisted": persisted,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn track(config: StoreConfig, window_id: u32, restore: bool) -> Result<()> {
    let (conn, screen_num) = x11::connect()?;
    let host = Rc::new(X11Host::new(conn.clone(), screen_num));
    let store = WindowStateStore::new(config, host.clone());

    let window = Rc::new(X11Window::attach(conn.clone(), host.root(), window_id)?);
    if restore {
        window.restore(store.x(), store.y(), store.width(), store.height())?;
    }
    store.manage(window.clone());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let _reader = x11::spawn_event_reader(conn, event_tx)?;
    let shutdown = register_shutdown_flag()?;
    let mut poll = tokio::time::interval(timing::SHUTDOWN_POLL);

    info!(window = window.id(), path = %store.file_path().display(), "Tracking window");

    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => window.dispatch(&event),
                None => {
                    warn!("X11 event stream ended, saving last captured state");
                    store.save_state(None);
                    break;
                }
            },
            _ = poll.tick() => {
                if shutdown.load(Ordering::Relaxed) {
                    info!("Shutdown requested, saving window state");
                    let managed: &dyn ManagedWindow = &*window;
                    store.save_state(Some(managed));
                    store.unmanage();
                    break;
                }
            }
        }

        // The closed handler has already saved and unmanaged
        if window.is_destroyed() {
            info!(window = window.id(), "Tracked window destroyed");
            break;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = cli.store_config()?;

    match cli.command {
        Command::Show => show(config),
        Command::Track { window, no_restore } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .context("Failed to build tokio runtime")?;
            LocalSet::new().block_on(&runtime, track(config, window, !no_restore))
        }
    }
}
