//! Diagnostics logging using tracing
//!
//! This is the crate's own fallback channel: render faults, file backend
//! failures and producer crashes are reported here, never through the
//! user-facing loggers they concern.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable controlling the diagnostics filter
pub const LOG_ENV: &str = "MLOG_LOG";

/// Initialize the diagnostics subsystem
///
/// Logs are written to `<data dir>/modern-logger/logs/`.
/// Log level is controlled by the `MLOG_LOG` environment variable.
///
/// # Examples
/// ```bash
/// MLOG_LOG=debug mlog-demo tui
/// MLOG_LOG=mlog_widget=trace mlog-demo tui
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "mlog.log");

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| crate::error::Error::config(format!("tracing already set: {}", e)))?;

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("Modern Logger diagnostics started");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the diagnostics directory path
pub fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("modern-logger").join("logs")
}
