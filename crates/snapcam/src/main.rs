//! Snapcam: live webcam preview with continuous recording, timed recording
//! and snapshots, driven by single-key commands.

mod app;
mod config;
mod error;
mod terminal_display;
mod terminal_guard;
mod terminal_input;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
    terminal_display::TerminalDisplay,
    terminal_guard::TerminalGuard,
    terminal_input::TerminalInput,
};

use crate::config::Config;

use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "snapcam=debug,snapcam_core=debug";
const LOG_FILE_NAME: &str = "snapcam.log";

/// Log to a file; the terminal belongs to the preview.
///
/// The returned guard flushes buffered lines when dropped and must be held
/// until exit.
fn init_logging() -> AppResult<WorkerGuard> {
    let log_dir = Config::log_dir()?;
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Load configuration and run the capture session.
fn run() -> AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    App { config }.run()?;

    Ok(())
}

/// Application entry point.
fn main() {
    let log_guard = match init_logging() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {}", e);
            std::process::exit(1);
        }
    };

    let result = run();
    if let Err(e) = &result {
        error!(error = ?e, "Snapcam failed");
    }

    // Flush the log file before exiting.
    drop(log_guard);

    if let Err(e) = result {
        eprintln!("snapcam: {}", e);
        std::process::exit(1);
    }
}
