use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::sanitize_base_url;
use crate::sync::{SyncOptions, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Dashboard API base URL, including any path prefix
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token attached to every request
    #[serde(default)]
    pub api_token: Option<String>,

    /// Records requested per page when the caller gives no limit
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Drop responses that arrive after a newer load was issued
    #[serde(default)]
    pub discard_stale_responses: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout(),
            discard_stale_responses: false,
        }
    }
}

impl ClientConfig {
    /// Loads `<config dir>/callboard/config.toml` if present, then applies
    /// `CALLBOARD_*` environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_path(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("callboard").join("config.toml"))
    }

    pub fn apply_env(&mut self) {
        if let Some(url) = env_non_empty("CALLBOARD_API_URL") {
            self.api_url = url;
        }
        if let Some(token) = env_non_empty("CALLBOARD_API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Some(size) = env_non_empty("CALLBOARD_PAGE_SIZE").and_then(|raw| raw.parse().ok()) {
            self.page_size = size;
        }
        if let Some(secs) =
            env_non_empty("CALLBOARD_REQUEST_TIMEOUT_SECS").and_then(|raw| raw.parse().ok())
        {
            self.request_timeout_secs = secs;
        }
        if let Some(flag) = env_non_empty("CALLBOARD_DISCARD_STALE") {
            self.discard_stale_responses = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
    }

    pub fn validate(&mut self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be greater than zero");
        }
        self.api_url = sanitize_base_url(std::mem::take(&mut self.api_url))?;
        if self.api_token.is_none() {
            tracing::warn!("no API token configured - requests will be sent unauthenticated");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            page_size: self.page_size,
            discard_stale_responses: self.discard_stale_responses,
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|raw| !raw.trim().is_empty())
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_request_timeout() -> u64 {
    15
}
