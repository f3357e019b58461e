//! Reader configuration.
//!
//! Loaded from environment variables or a TOML file, then validated.
//!
//! | variable                    | default                      |
//! |-----------------------------|------------------------------|
//! | `BLOG_API_URL`              | `http://localhost/wp-json`   |
//! | `BLOG_PER_PAGE`             | `10`                         |
//! | `BLOG_REQUEST_TIMEOUT_SECS` | unset (no timeout)           |

use crate::environment::DEFAULT_PER_PAGE;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// API base URL used when none is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost/wp-json";

/// Largest page size the posts endpoint accepts
pub const MAX_PER_PAGE: u32 = 100;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {reason}")]
    Read {
        /// File path
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// The configuration file is not valid TOML for this schema
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A variable holds a value of the wrong type
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable or field name
        key: &'static str,
        /// Offending value
        value: String,
    },

    /// A value parsed but is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Reader configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Root of the content API, e.g. `https://blog.example/wp-json`
    pub api_base_url: String,
    /// Page size applied when a request does not carry one
    pub default_per_page: u32,
    /// Per-request timeout; `None` lets a fetch wait indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_per_page: DEFAULT_PER_PAGE,
            request_timeout: None,
        }
    }
}

/// On-disk shape of [`ReaderConfig`]
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_base_url: Option<String>,
    default_per_page: Option<u32>,
    request_timeout_secs: Option<u64>,
}

impl ReaderConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable cannot be parsed or the result
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// See [`ReaderConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            api_base_url: lookup("BLOG_API_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            default_per_page: parse_var(&lookup, "BLOG_PER_PAGE")?.unwrap_or(DEFAULT_PER_PAGE),
            request_timeout: parse_var(&lookup, "BLOG_REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or unknown keys, and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let config = Self {
            api_base_url: file
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            default_per_page: file.default_per_page.unwrap_or(DEFAULT_PER_PAGE),
            request_timeout: file.request_timeout_secs.map(Duration::from_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise see
    /// [`ReaderConfig::from_toml`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        if self.default_per_page == 0 || self.default_per_page > MAX_PER_PAGE {
            return Err(ConfigError::Invalid(format!(
                "default_per_page must be between 1 and {MAX_PER_PAGE}, got {}",
                self.default_per_page
            )));
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value })
        })
        .transpose()
}
