use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the stats backend, without a trailing slash.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Client-side timeout for `GET /stats`.
    #[serde(default = "default_stats_timeout_ms")]
    pub stats_timeout_ms: u64,
    /// Optional timeout for `GET /history`. `None` leaves it to the transport.
    #[serde(default)]
    pub history_timeout_ms: Option<u64>,
    /// Number of live samples kept for the live chart view.
    #[serde(default = "default_live_window")]
    pub live_window: usize,
    #[serde(default = "default_cpu_warning_threshold")]
    pub cpu_warning_threshold: f64,
}

fn default_api_base_url() -> String { "http://localhost:5000/api".into() }
fn default_poll_interval_ms() -> u64 { 2000 }
fn default_stats_timeout_ms() -> u64 { 1000 }
/// Upper bound for `live_window`; the live chart never holds more samples.
pub const MAX_LIVE_WINDOW: usize = 20;

fn default_live_window() -> usize { MAX_LIVE_WINDOW }
fn default_cpu_warning_threshold() -> f64 { 80.0 }

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            stats_timeout_ms: default_stats_timeout_ms(),
            history_timeout_ms: None,
            live_window: default_live_window(),
            cpu_warning_threshold: default_cpu_warning_threshold(),
        }
    }
}

impl Config {
    /// Linux → ~/.config/sysdash/, Windows → AppData/Local/sysdash/
    fn config_path() -> PathBuf {
        dirs::config_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sysdash")
            .join("config.json")
    }

    /// Load the config file, falling back to defaults when it is missing or broken.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(contents)?;
        config.sanitize();
        Ok(config)
    }

    /// Clamp all numeric fields to usable ranges.
    fn sanitize(&mut self) {
        while self.api_base_url.ends_with('/') {
            self.api_base_url.pop();
        }
        if self.api_base_url.is_empty() {
            self.api_base_url = default_api_base_url();
        }
        self.poll_interval_ms = self.poll_interval_ms.clamp(250, 60_000);
        self.stats_timeout_ms = self.stats_timeout_ms.clamp(50, self.poll_interval_ms);
        self.history_timeout_ms = self.history_timeout_ms.map(|ms| ms.max(50));
        self.live_window = self.live_window.clamp(2, MAX_LIVE_WINDOW);
        self.cpu_warning_threshold = self.cpu_warning_threshold.clamp(1.0, 100.0);
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stats_timeout(&self) -> Duration {
        Duration::from_millis(self.stats_timeout_ms)
    }

    pub fn history_timeout(&self) -> Option<Duration> {
        self.history_timeout_ms.map(Duration::from_millis)
    }
}
