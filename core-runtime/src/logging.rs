//! # Logging & Tracing Infrastructure
//!
//! Structured logging with the `tracing` crate:
//! - Pretty, JSON and compact output formats
//! - Module-level filtering through `EnvFilter`; `RUST_LOG` overrides the
//!   configured filter
//! - Span events for instrumented service calls
//!
//! Log lines are written to stderr. Stdout belongs to the interactive menu, so
//! the two streams can be redirected independently.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::LogLevel;
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Compact)
//!     .with_level(LogLevel::Debug);
//! init_logging(config)?;
//!
//! tracing::info!("Catalog started");
//! ```

use crate::error::{Error, Result};
use bridge_traits::LogLevel;
use std::io;
use std::str::FromStr;
use tracing_subscriber::{
    filter::EnvFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Workspace crates that follow the configured level; everything else is
/// held at `warn`.
const WORKSPACE_TARGETS: &[&str] = &[
    "literalura",
    "core_runtime",
    "core_library",
    "core_metadata",
    "core_service",
    "bridge_desktop",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Single-line format
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(Error::Config(format!("unknown log format '{}'", other))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Minimum log level for workspace crates
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_service=debug,sqlx=info")
    pub filter: Option<String>,
    /// Emit span open/close events
    pub enable_spans: bool,
    /// Display target module in logs
    pub display_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            enable_spans: false,
            display_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set custom filter string, replacing the workspace default
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }
}

/// Initialize the logging system
///
/// Call once during startup. A second call returns [`Error::Config`] because
/// the global subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.display_target)
                    .with_span_events(span_events)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(config.enable_spans)
                    .with_span_list(config.enable_spans)
                    .with_target(config.display_target)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.display_target)
                    .with_span_events(span_events)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

/// `RUST_LOG` when set, else the configured filter, else the workspace default.
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(config, from_env.as_deref())
}

fn filter_from(config: &LoggingConfig, env_directives: Option<&str>) -> Result<EnvFilter> {
    let filter_string = match (env_directives.map(str::trim), &config.filter) {
        (Some(directives), _) if !directives.is_empty() => directives.to_string(),
        (_, Some(custom)) => custom.clone(),
        _ => default_filter(config.level),
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

fn default_filter(level: LogLevel) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level)),
    );
    directives.push("sqlx=warn".to_string());
    directives.push("reqwest=warn".to_string());
    directives.push("hyper=warn".to_string());
    directives.join(",")
}
