//! Configuration types.
//!
//! ```toml
//! api_url = "https://family.example.com/api"
//! timeout_secs = 30
//! session_file = "~/.local/share/hearth/session.json"
//! user_agent = "hearth/0.1"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// API base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const API_URL_ENV: &str = "HEARTH_API_URL";
const SESSION_FILE_ENV: &str = "HEARTH_SESSION_FILE";
const TIMEOUT_ENV: &str = "HEARTH_TIMEOUT_SECS";

/// Client configuration.
///
/// Every field is optional so layers can be merged; the accessors fill in
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL, including any `/api` prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Where the login session is persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,

    /// Custom User-Agent header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        if let Some(secs) = config.timeout_secs {
            check_timeout("timeout_secs", secs)?;
        }
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: ClientConfig) {
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.session_file.is_some() {
            self.session_file = other.session_file;
        }
        if other.user_agent.is_some() {
            self.user_agent = other.user_agent;
        }
    }

    /// Apply `HEARTH_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`. Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(API_URL_ENV) {
            self.api_url = Some(url);
        }
        if let Some(path) = get(SESSION_FILE_ENV) {
            self.session_file = Some(PathBuf::from(path));
        }
        if let Some(secs) = get(TIMEOUT_ENV) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: TIMEOUT_ENV.to_string(),
                    message: e.to_string(),
                })?;
            check_timeout(TIMEOUT_ENV, secs)?;
            self.timeout_secs = Some(secs);
        }
        Ok(())
    }

    /// Effective API base URL.
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Effective request timeout. A zero timeout falls back to the default.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Effective session file location.
    ///
    /// Falls back to `<data dir>/hearth/session.json`. A leading `~/` is
    /// expanded to the home directory.
    pub fn session_file(&self) -> Result<PathBuf> {
        match &self.session_file {
            Some(path) => Ok(expand_home(path)),
            None => crate::default_session_file(),
        }
    }
}

fn check_timeout(field: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: "timeout must be at least 1 second".to_string(),
        });
    }
    Ok(())
}

fn expand_home(path: &std::path::Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
