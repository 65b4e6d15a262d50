//! `plantwall-tui`: live terminal dashboard for a plant wall.
//!
//! Three screens navigable by number keys: Status (system snapshot,
//! sensors, subsystem health), Lighting, and Watering. Each screen is a
//! pure render of a `plantwall_core` panel; a background data bridge
//! forwards every panel state change into the action loop.
//!
//! Logs are written to a file (default `/tmp/plantwall-tui.log`) so they
//! never corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use plantwall_config::Environment;
use plantwall_core::{Dashboard, DashboardConfig};

use crate::app::App;

/// Terminal dashboard for monitoring and controlling a plant wall.
#[derive(Parser, Debug)]
#[command(name = "plantwall-tui", version, about)]
struct Cli {
    /// Backend profile to use
    #[arg(short = 'p', long, env = "PLANTWALL_PROFILE")]
    profile: Option<String>,

    /// Backend URL (overrides profile and environment)
    #[arg(short = 'b', long, env = "PLANTWALL_BACKEND")]
    backend: Option<String>,

    /// Deployment environment: production or development
    #[arg(short = 'e', long = "env", env = "PLANTWALL_ENV")]
    environment: Option<Environment>,

    /// Log file path
    #[arg(long, default_value = "/tmp/plantwall-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may log to stdout/stderr while the
/// terminal is in raw mode. Hold the guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "plantwall_tui={log_level},plantwall_core={log_level},plantwall_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("plantwall-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the dashboard config: flags > profile > defaults.
fn build_dashboard_config(cli: &Cli) -> Result<DashboardConfig> {
    let cfg = plantwall_config::load_config().wrap_err("failed to load configuration")?;
    let (_, profile) = cfg.select_profile(cli.profile.as_deref())?;
    let mut config = plantwall_config::dashboard_config(&cfg.defaults, profile)?;

    if cli.backend.is_some() || cli.environment.is_some() {
        let environment = cli
            .environment
            .or_else(|| profile.and_then(|p| p.environment))
            .unwrap_or(cfg.defaults.environment);
        let explicit = cli
            .backend
            .as_deref()
            .or_else(|| profile.and_then(|p| p.backend.as_deref()));
        config.url = plantwall_config::resolve_backend_url(explicit, environment)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_dashboard_config(&cli)?;
    info!(url = %config.url, "starting plantwall-tui");

    let dashboard = Dashboard::new(config)?;
    let mut app = App::new(dashboard.clone());
    let result = app.run().await;

    // Timers and in-flight fetches are cancelled here.
    tokio::time::timeout(Duration::from_secs(2), dashboard.shutdown())
        .await
        .ok();
    result
}
