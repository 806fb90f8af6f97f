//! Tracing subscriber setup.
//!
//! The terminal UI owns stderr, so it logs to a daily-rolling file under
//! `$WPDB_HOME/logs`. Headless commands log to stderr.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogConfig, paths};

const LOG_FILE_NAME: &str = "wpdb.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    /// `$WPDB_HOME/logs/wpdb.log`, rotated daily.
    File,
}

/// Resolves the filter: `RUST_LOG`, then `WPDB_LOG`, then the config.
fn log_filter(configured: &str) -> EnvFilter {
    let level = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var("WPDB_LOG"))
        .unwrap_or_else(|_| configured.to_string());

    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber.
///
/// Returns the appender guard for file logging; keep it alive until exit or
/// buffered lines are lost. A file sink with `log.file = false` installs
/// nothing.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a subscriber
/// is already installed.
pub fn init(config: &LogConfig, sink: LogSink) -> Result<Option<WorkerGuard>> {
    match sink {
        LogSink::Stderr => {
            tracing_subscriber::registry()
                .with(log_filter(&config.level))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init()
                .context("Failed to install logger")?;
            Ok(None)
        }
        LogSink::File if !config.file => Ok(None),
        LogSink::File => init_file(&paths::logs_dir(), &config.level).map(Some),
    }
}

fn init_file(dir: &Path, level: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(log_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install logger")?;

    Ok(guard)
}
