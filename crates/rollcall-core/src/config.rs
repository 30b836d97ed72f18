//! Application configuration management.
//!
//! Configuration is stored at `~/.config/rollcall/config.json`. Environment
//! variables (`ROLLCALL_BASE_URL`, `ROLLCALL_TRAINER_ID`, `ROLLCALL_TOKEN`)
//! override the file; callers load `.env` first if they want one honoured.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_TIMEOUT_SECS;
use crate::auth::OperatorContext;

/// Application name used for config/log directory paths
const APP_NAME: &str = "rollcall";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Terminals narrower than this many columns get abbreviated names.
const DEFAULT_NARROW_WIDTH: u16 = 80;

pub const ENV_BASE_URL: &str = "ROLLCALL_BASE_URL";
pub const ENV_TRAINER_ID: &str = "ROLLCALL_TRAINER_ID";
pub const ENV_TOKEN: &str = "ROLLCALL_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub trainer_id: Option<i64>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_narrow_width")]
    pub narrow_width: u16,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_narrow_width() -> u16 {
    DEFAULT_NARROW_WIDTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            trainer_id: None,
            token: None,
            request_timeout_secs: default_timeout_secs(),
            narrow_width: default_narrow_width(),
        }
    }
}

impl Config {
    /// Load the config file (defaults if absent) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_json(&contents)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config file")
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(id) = lookup(ENV_TRAINER_ID).filter(|v| !v.trim().is_empty()) {
            let id = id
                .trim()
                .parse::<i64>()
                .with_context(|| format!("{} must be an integer, got {:?}", ENV_TRAINER_ID, id))?;
            self.trainer_id = Some(id);
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.token = Some(token.trim().to_string());
        }
        Ok(())
    }

    pub fn operator(&self) -> OperatorContext {
        OperatorContext::new(self.trainer_id, self.token.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for log files
    pub fn log_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
