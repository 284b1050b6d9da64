//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the catalog crates:
//! - Logging and tracing setup
//! - Configuration management (builder, environment loading, validation)
//!
//! Every other crate in the workspace logs through `tracing` and reads its
//! settings from the [`config::CatalogConfig`] produced here.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
