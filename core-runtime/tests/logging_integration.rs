//! Integration tests for logging and configuration bootstrap

use bridge_traits::LogLevel;
use core_runtime::config::CatalogConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

#[test]
fn test_logging_initializes_once() {
    // The global subscriber can only be installed once per process, so both
    // calls live in the same test.
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug);

    assert!(init_logging(config.clone()).is_ok());
    tracing::info!(target: "core_runtime", "logging initialized in test");

    let second = init_logging(config);
    assert!(second.is_err());
}

#[test]
fn test_invalid_custom_filter_is_rejected() {
    // RUST_LOG replaces the configured filter.
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let config = LoggingConfig::default().with_filter("core_service=loud");
    assert!(init_logging(config).is_err());
}

#[test]
fn test_config_drives_logging_settings() {
    let catalog = CatalogConfig::builder()
        .log_level(LogLevel::Warn)
        .log_format(LogFormat::Json)
        .build()
        .unwrap();

    let logging = LoggingConfig::default()
        .with_level(catalog.log_level)
        .with_format(catalog.log_format);

    assert_eq!(logging.level, LogLevel::Warn);
    assert_eq!(logging.format, LogFormat::Json);
}
