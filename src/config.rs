//! Configuration file parser for ~/.config/gnews/config.toml.
//!
//! The config file is optional. A missing or empty file yields
//! `Config::default()`. A loaded config is already checked: `base_url` is a
//! usable endpoint and the default codes are supported and lower-cased.
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::feed::{DEFAULT_BASE_URL, MAX_FEED_SIZE};
use crate::params::{ServiceDefaults, ValidationError};
use crate::util::{validate_base_url, UrlValidationError};

/// Maximum config file size (1 MB).
const MAX_FILE_SIZE: u64 = 1_048_576;

const KNOWN_KEYS: [&str; 6] = [
    "base_url",
    "country",
    "language",
    "request_timeout_secs",
    "user_agent",
    "max_feed_bytes",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid base_url in config file: {0}")]
    InvalidBaseUrl(#[from] UrlValidationError),

    #[error("Invalid default in config file: {0}")]
    InvalidDefault(#[from] ValidationError),
}

/// Client configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root RSS endpoint. Search requests go to `{base_url}/search`.
    pub base_url: String,

    /// Country used when a call does not name one.
    pub country: Option<String>,

    /// Language used when a call does not name one.
    pub language: Option<String>,

    /// Whole-request timeout in seconds. Unset leaves the HTTP client's own
    /// behaviour in place.
    pub request_timeout_secs: Option<u64>,

    pub user_agent: String,

    /// Feed bodies larger than this are rejected.
    pub max_feed_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            country: None,
            language: None,
            request_timeout_secs: None,
            user_agent: concat!("gnews/", env!("CARGO_PKG_VERSION")).to_string(),
            max_feed_bytes: MAX_FEED_SIZE,
        }
    }
}

impl Config {
    /// Loads and checks the config file at `path`.
    ///
    /// - Missing, empty or whitespace-only file → `Ok(Config::default())`
    /// - Over 1 MB → `Err(ConfigError::TooLarge)`
    /// - Invalid TOML or wrong value types → `Err(ConfigError::Parse)`
    /// - Bad endpoint or unsupported default code → `InvalidBaseUrl` / `InvalidDefault`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(content) = read_config_file(path)? else {
            return Ok(Self::default());
        };

        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            base_url = %config.base_url,
            country = ?config.country,
            language = ?config.language,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parses config text and normalizes it.
    ///
    /// The trailing `/` of `base_url` is dropped and default codes are
    /// lower-cased; empty codes become `None`.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        warn_unknown_keys(content);

        let mut config: Config = toml::from_str(content)?;
        config.base_url = validate_base_url(&config.base_url)?;

        let defaults = config.service_defaults()?;
        config.country = defaults.country().map(str::to_owned);
        config.language = defaults.language().map(str::to_owned);

        Ok(config)
    }

    /// Validated fallback codes for [`crate::NewsService`].
    pub fn service_defaults(&self) -> Result<ServiceDefaults, ValidationError> {
        ServiceDefaults::new(self.country.as_deref(), self.language.as_deref())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Reads the config file, or `None` when there is nothing to read.
///
/// The size is checked on the open handle and the read is capped, so a file
/// that grows after the check is still rejected.
fn read_config_file(path: &Path) -> Result<Option<String>, ConfigError> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            return Ok(None);
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };

    let too_large = |len: u64| {
        ConfigError::TooLarge(format!(
            "Config file is {len} bytes (max {MAX_FILE_SIZE} bytes)"
        ))
    };

    let len = file.metadata()?.len();
    if len > MAX_FILE_SIZE {
        return Err(too_large(len));
    }

    let mut content = String::new();
    file.take(MAX_FILE_SIZE + 1).read_to_string(&mut content)?;
    if content.len() as u64 > MAX_FILE_SIZE {
        return Err(too_large(content.len() as u64));
    }

    if content.trim().is_empty() {
        tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
        return Ok(None);
    }

    Ok(Some(content))
}

fn warn_unknown_keys(content: &str) {
    // Syntax errors are reported by the typed parse
    let Ok(raw) = content.parse::<toml::Table>() else {
        return;
    };
    for key in raw.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
        tracing::warn!(key = %key, "Unknown key in config file, ignoring");
    }
}
