//! REQ/REP Panel — a desktop window for poking at ZeroMQ request/reply.
//!
//! # Usage
//!
//! ```bash
//! reqrep-panel                          # defaults: 127.0.0.1, port 5555
//! reqrep-panel --port 6000              # pre-fill a different port
//! reqrep-panel --config ./panel.toml    # read settings from another file
//! ```
//!
//! Everything else happens in the window: connect as a client, start a
//! server, send messages, and watch the last few exchanges.
//!
//! # Architecture
//!
//! One thread does all the work. eframe drives the frame loop; on every
//! frame `PanelApp` renders its controls, applies the resulting actions,
//! polls both sockets without blocking, and renders the log.
//!
//! Exit code is `0` on a normal close and `-1` when the GUI backend
//! cannot start.

mod app;
mod ui;

use anyhow::{Context, Result};
use app::PanelApp;
use clap::Parser;
use eframe::egui;
use reqrep_core::config::PanelConfig;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// REQ/REP messaging panel.
#[derive(Parser, Debug)]
#[command(name = "reqrep-panel", about = "Desktop REQ/REP messaging panel")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial Target IP. Overrides the config for this run.
    #[arg(long)]
    ip: Option<String>,

    /// Initial Port. Overrides the config for this run.
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The REQREP_LOG env var controls the log level (default: info).
    init_logging();

    let mut config = load_config(cli.config.as_deref())?;

    // CLI overrides
    if let Some(ip) = cli.ip {
        config.target_ip = ip;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let panel = PanelApp::new(&config).context("failed to create messaging session")?;

    info!(
        ip = %config.target_ip,
        port = config.port,
        frame_rate = config.frame_rate,
        "starting panel"
    );

    if let Err(e) = run_window(&config, panel) {
        error!(error = %e, "GUI backend failed to initialize");
        std::process::exit(-1);
    }

    info!("window closed");
    Ok(())
}

/// Reads the config from `path`, or from the platform default location.
///
/// A missing file is not an error: the panel starts with defaults.
fn load_config(path: Option<&std::path::Path>) -> Result<PanelConfig> {
    let path = match path {
        Some(path) => path.to_owned(),
        None => match PanelConfig::config_file_path() {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "using default config");
                return Ok(PanelConfig::default());
            }
        },
    };

    match PanelConfig::load_from(&path)? {
        Some(config) => {
            info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => {
            info!(path = %path.display(), "no config file, using defaults");
            Ok(PanelConfig::default())
        }
    }
}

/// Opens the window and runs the frame loop until it is closed.
fn run_window(config: &PanelConfig, panel: PanelApp) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size([config.window_width as f32, config.window_height as f32]),
        vsync: config.vsync,
        ..Default::default()
    };

    eframe::run_native(
        &config.window_title,
        options,
        Box::new(move |_cc| Ok(Box::new(panel))),
    )
}

/// Initializes the tracing logging infrastructure.
///
/// Sets up a layered subscriber that writes to:
/// 1. stderr — so logs appear in the terminal the panel was started from
/// 2. `panel.log` in the data directory — persists across runs
///
/// The log level is controlled by the `REQREP_LOG` environment variable.
/// Defaults to `info` if not set.
fn init_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_env("REQREP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    // If the log file can't be opened, stderr logging still works.
    let file_layer = PanelConfig::data_dir()
        .and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("panel.log"))
                .ok()
        })
        .map(|file| {
            fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
