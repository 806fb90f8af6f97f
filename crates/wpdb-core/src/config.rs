//! Configuration management for wpdb.
//!
//! Loads configuration from ${WPDB_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::projector::ConsoleLayout;
use crate::transport::TransportMode;
use crate::transport::notifier::NotifierConfig;

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for wpdb configuration and data directories.
    //!
    //! WPDB_HOME resolution order:
    //! 1. WPDB_HOME environment variable (if set)
    //! 2. ~/.config/wpdb (default)
    //! 3. ./.wpdb when no home directory can be determined

    use std::path::PathBuf;

    pub fn wpdb_home() -> PathBuf {
        if let Ok(home) = std::env::var("WPDB_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".wpdb"),
            |h| h.join(".config").join("wpdb"),
        )
    }

    pub fn config_path() -> PathBuf {
        wpdb_home().join("config.toml")
    }

    pub fn logs_dir() -> PathBuf {
        wpdb_home().join("logs")
    }
}

/// Floor for polling so a zero in the config cannot spin the loop.
const MIN_POLL_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_ms: 333 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub coalesce_ms: u64,
    pub reconnect_ms: u64,
    pub ws_path: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            coalesce_ms: 5,
            reconnect_ms: 2000,
            ws_path: "ws".to_string(),
        }
    }
}

/// Terminal rows for the console pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub console_min_rows: u16,
    pub console_reserved_rows: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            console_min_rows: 6,
            console_reserved_rows: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the debugger's web console.
    pub url: String,
    pub mode: TransportMode,
    pub request_timeout_ms: u64,
    pub poll: PollConfig,
    pub push: PushConfig,
    pub layout: LayoutConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT_URL.to_string(),
            mode: TransportMode::Poll,
            request_timeout_ms: 5000,
            poll: PollConfig::default(),
            push: PushConfig::default(),
            layout: LayoutConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_URL: &'static str = "http://127.0.0.1:5555/";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Parsed base URL.
    ///
    /// # Errors
    /// Returns an error if `url` is not an absolute http(s) URL.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.url).with_context(|| format!("Invalid url '{}'", self.url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Unsupported url scheme '{}': expected http or https", url.scheme());
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.push.reconnect_ms)
    }

    pub fn notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            mode: self.mode,
            poll_interval: Duration::from_millis(self.poll.interval_ms.max(MIN_POLL_INTERVAL_MS)),
            coalesce: Duration::from_millis(self.push.coalesce_ms),
        }
    }

    /// Console sizing in terminal rows.
    pub fn console_layout(&self) -> ConsoleLayout {
        ConsoleLayout {
            min_height: self.layout.console_min_rows,
            reserved: self.layout.console_reserved_rows,
        }
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename).
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.poll.interval_ms, 333);
        assert_eq!(config.mode, TransportMode::Poll);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "mode = \"push\"\n[push]\nws_path = \"/socket\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.mode, TransportMode::Push);
        assert_eq!(config.push.ws_path, "/socket");
        assert_eq!(config.push.coalesce_ms, 5);
        assert_eq!(config.url, Config::DEFAULT_URL);
    }

    #[test]
    fn test_load_invalid_toml_fails_with_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "mode = [").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_default_template_matches_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_creates_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("interval_ms = 333"));
        assert!(!dir.path().join("subdir").join("config.toml.tmp").exists());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_base_url_validation() {
        let config = Config {
            url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.base_url().is_err());

        let config = Config {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.base_url().is_err());

        assert!(Config::default().base_url().is_ok());
    }

    #[test]
    fn test_poll_interval_has_floor() {
        let config = Config {
            poll: PollConfig { interval_ms: 0 },
            ..Default::default()
        };
        assert_eq!(
            config.notifier_config().poll_interval,
            Duration::from_millis(MIN_POLL_INTERVAL_MS)
        );
    }
}
