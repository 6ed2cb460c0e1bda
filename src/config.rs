// ABOUTME: Console configuration loaded from defaults, a TOML file and the environment
// ABOUTME: Later sources override earlier ones; CLI flags are applied by the caller

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConsoleError;
use crate::jobs::PollSettings;

pub const CONFIG_ENV: &str = "SCRAPE_CONSOLE_CONFIG";
pub const API_URL_ENV: &str = "SCRAPE_CONSOLE_API_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    pub poll_interval_secs: u64,
    pub max_status_retries: u32,
    pub request_timeout_secs: u64,
    /// Defaults to `<config dir>/scrape-console/session.json`.
    pub session_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            poll_interval_secs: 5,
            max_status_retries: 3,
            request_timeout_secs: 30,
            session_file: None,
        }
    }
}

impl Config {
    /// Reads `path` (or the file named by `SCRAPE_CONSOLE_CONFIG`) on top of the
    /// defaults, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConsoleError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConsoleError::Config(
                "poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_status_retries == 0 {
            return Err(ConsoleError::Config(
                "max_status_retries must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Where the login token lives. Without an explicit `session_file` this
    /// is the per-user config directory.
    pub fn session_path(&self) -> Result<PathBuf, ConsoleError> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join("scrape-console").join("session.json"))
            .ok_or_else(|| {
                ConsoleError::Config(
                    "no per-user config directory found; set session_file in the config file"
                        .to_string(),
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.poll_interval_secs),
            max_retries: self.max_status_retries,
        }
    }
}
