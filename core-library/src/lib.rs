//! # Catalog Library Module
//!
//! Owns the persisted book catalog and the repository patterns used to
//! access it.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite schema, migrations and connection pooling
//! - `AuthorRepository` / `BookRepository` with conflict-aware inserts that
//!   keep author names and book titles unique
//! - `LibraryQueryService`, the read-only listings, counts and rankings

pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod repositories;

pub use error::{LibraryError, Result};
