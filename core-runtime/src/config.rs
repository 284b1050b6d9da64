//! # Catalog Configuration
//!
//! Settings for the catalog application: where the SQLite database lives,
//! how to reach the bibliographic search API and how verbose logging is.
//!
//! ## Usage
//!
//! ### Builder
//!
//! ```
//! use core_runtime::config::CatalogConfig;
//!
//! let config = CatalogConfig::builder()
//!     .database_path("/tmp/literalura.db")
//!     .search_base_url("https://gutendex.com/books/")
//!     .build()
//!     .expect("valid configuration");
//! assert_eq!(config.search.request_timeout_secs, 30);
//! ```
//!
//! ### Environment
//!
//! [`CatalogConfig::from_env`] loads a `.env` file when present and then reads
//! the `LITERALURA_*` variables. Anything unset keeps its default.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LITERALURA_DATABASE_PATH` | `literalura.db` |
//! | `LITERALURA_SEARCH_BASE_URL` | `https://gutendex.com/books/` |
//! | `LITERALURA_USER_AGENT` | `literalura/<version>` |
//! | `LITERALURA_REQUEST_TIMEOUT_SECS` | `30` |
//! | `LITERALURA_LOG_LEVEL` | `info` |
//! | `LITERALURA_LOG_FORMAT` | `pretty` (debug) / `json` (release) |

use crate::error::{Error, Result};
use crate::logging::LogFormat;
use bridge_traits::LogLevel;
use std::path::PathBuf;
use std::time::Duration;

/// Default SQLite database file
pub const DEFAULT_DATABASE_PATH: &str = "literalura.db";

/// Gutendex search endpoint
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://gutendex.com/books/";

/// User agent sent with every search request
pub const DEFAULT_USER_AGENT: &str = concat!("literalura/", env!("CARGO_PKG_VERSION"));

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

const ENV_DATABASE_PATH: &str = "LITERALURA_DATABASE_PATH";
const ENV_SEARCH_BASE_URL: &str = "LITERALURA_SEARCH_BASE_URL";
const ENV_USER_AGENT: &str = "LITERALURA_USER_AGENT";
const ENV_REQUEST_TIMEOUT_SECS: &str = "LITERALURA_REQUEST_TIMEOUT_SECS";
const ENV_LOG_LEVEL: &str = "LITERALURA_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "LITERALURA_LOG_FORMAT";

/// Top-level application configuration.
///
/// Use [`CatalogConfigBuilder`] or [`CatalogConfig::from_env`] to construct it;
/// both run [`validate`](CatalogConfig::validate) before handing it out.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Bibliographic search API settings
    pub search: SearchApiConfig,

    /// Minimum log level
    pub log_level: LogLevel,

    /// Log output format
    pub log_format: LogFormat,
}

/// Connection settings for the bibliographic search API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchApiConfig {
    /// Endpoint that accepts `?search=<terms>`
    pub base_url: String,

    /// User agent identifying the application to the API
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for SearchApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SearchApiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validates the search settings
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "Search base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("User agent cannot be empty".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "Request timeout must be greater than 0 seconds".to_string(),
            ));
        }

        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(Error::Config(format!(
                "Request timeout exceeds maximum of {} seconds",
                MAX_REQUEST_TIMEOUT_SECS
            )));
        }

        Ok(())
    }
}

impl CatalogConfig {
    /// Creates a new builder for constructing a `CatalogConfig`.
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first;
    /// variables already present in the environment win over it.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(path) = non_empty(lookup(ENV_DATABASE_PATH)) {
            builder = builder.database_path(path);
        }

        if let Some(url) = non_empty(lookup(ENV_SEARCH_BASE_URL)) {
            builder = builder.search_base_url(url);
        }

        if let Some(agent) = non_empty(lookup(ENV_USER_AGENT)) {
            builder = builder.user_agent(agent);
        }

        if let Some(raw) = non_empty(lookup(ENV_REQUEST_TIMEOUT_SECS)) {
            let secs = raw.parse::<u64>().map_err(|e| Error::InvalidEnv {
                name: ENV_REQUEST_TIMEOUT_SECS.to_string(),
                message: e.to_string(),
            })?;
            builder = builder.request_timeout_secs(secs);
        }

        if let Some(raw) = non_empty(lookup(ENV_LOG_LEVEL)) {
            let level = raw.parse::<LogLevel>().map_err(|e| Error::InvalidEnv {
                name: ENV_LOG_LEVEL.to_string(),
                message: e.to_string(),
            })?;
            builder = builder.log_level(level);
        }

        if let Some(raw) = non_empty(lookup(ENV_LOG_FORMAT)) {
            let format = raw.parse::<LogFormat>().map_err(|e| Error::InvalidEnv {
                name: ENV_LOG_FORMAT.to_string(),
                message: e.to_string(),
            })?;
            builder = builder.log_format(format);
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        self.search.validate()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Builder for constructing [`CatalogConfig`] instances.
#[derive(Debug, Default)]
pub struct CatalogConfigBuilder {
    database_path: Option<PathBuf>,
    search: SearchApiConfig,
    log_level: Option<LogLevel>,
    log_format: Option<LogFormat>,
}

impl CatalogConfigBuilder {
    /// Sets the SQLite database path.
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Sets the search endpoint.
    pub fn search_base_url(mut self, url: impl Into<String>) -> Self {
        self.search = self.search.with_base_url(url);
        self
    }

    /// Sets the user agent for search requests.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.search = self.search.with_user_agent(agent);
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.search = self.search.with_request_timeout_secs(secs);
        self
    }

    /// Replaces all search settings at once.
    pub fn search(mut self, search: SearchApiConfig) -> Self {
        self.search = search;
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<CatalogConfig> {
        let config = CatalogConfig {
            database_path: self
                .database_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            search: self.search,
            log_level: self.log_level.unwrap_or(LogLevel::Info),
            log_format: self.log_format.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
