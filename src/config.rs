//! Console configuration loaded from TOML
//!
//! Every section is optional. Missing values fall back to the built-in
//! defaults, and `PROMPT_HUB_API_BASE_URL` overrides the backend address.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{DEFAULT_LEFT_MODEL, DEFAULT_RIGHT_MODEL};
use crate::template::MissingValue;

/// Environment variable that overrides `api.base_url`
pub const BASE_URL_ENV: &str = "PROMPT_HUB_API_BASE_URL";

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Playground defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaygroundConfig {
    pub left_model: String,
    pub right_model: String,
    pub sync: bool,
}

/// Complete console configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub playground: PlaygroundConfig,
    /// Rendering of placeholders without a value
    pub missing: MissingValue,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    api: Option<TomlApi>,
    playground: Option<TomlPlayground>,
    render: Option<TomlRender>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlPlayground {
    left_model: Option<String>,
    right_model: Option<String>,
    sync: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRender {
    missing: Option<MissingValue>,
}

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl ConsoleConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        Ok(Self::from_toml(parsed))
    }

    fn from_toml(parsed: TomlConfig) -> Self {
        let api = parsed.api;
        let playground = parsed.playground;

        Self {
            api: ApiConfig {
                base_url: api
                    .as_ref()
                    .and_then(|a| a.base_url.clone())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: Duration::from_secs(
                    api.as_ref()
                        .and_then(|a| a.timeout_secs)
                        .unwrap_or(DEFAULT_TIMEOUT_SECS),
                ),
            },
            playground: PlaygroundConfig {
                left_model: playground
                    .as_ref()
                    .and_then(|p| p.left_model.clone())
                    .unwrap_or_else(|| DEFAULT_LEFT_MODEL.to_string()),
                right_model: playground
                    .as_ref()
                    .and_then(|p| p.right_model.clone())
                    .unwrap_or_else(|| DEFAULT_RIGHT_MODEL.to_string()),
                sync: playground.as_ref().and_then(|p| p.sync).unwrap_or(true),
            },
            missing: parsed.render.and_then(|r| r.missing).unwrap_or_default(),
        }
    }

    /// Apply `PROMPT_HUB_API_BASE_URL` if it is set and non-empty
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => self.with_base_url(url),
            _ => self,
        }
    }

    /// Set the backend base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.api.timeout = timeout;
        self
    }

    /// Set the missing-value policy
    pub fn with_missing(mut self, missing: MissingValue) -> Self {
        self.missing = missing;
        self
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}
