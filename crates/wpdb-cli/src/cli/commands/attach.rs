//! Attach command: the full-screen console.

use anyhow::Result;
use wpdb_core::config::Config;

#[cfg(feature = "tui")]
pub fn run(config: &Config) -> Result<()> {
    use wpdb_core::logging::{self, LogSink};

    let _guard = logging::init(&config.log, LogSink::File)?;
    tracing::info!(url = %config.url, mode = %config.mode, "Attaching");
    wpdb_tui::run(config)
}

#[cfg(not(feature = "tui"))]
pub fn run(_config: &Config) -> Result<()> {
    anyhow::bail!("Built without the terminal UI. Use `wpdb watch` instead.")
}
