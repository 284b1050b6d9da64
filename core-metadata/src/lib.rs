//! # Book Search Module
//!
//! Looks up candidate books in the public Gutendex catalog of Project
//! Gutenberg.
//!
//! ## Overview
//!
//! This module handles:
//! - The `BookSearchProvider` abstraction consumed by the catalog service
//! - `GutendexClient`, the HTTP implementation over `bridge_traits::HttpClient`
//! - Candidate records decoded leniently, so one bad entry does not reject
//!   the whole response

pub mod error;
pub mod models;
pub mod providers;

pub use error::{MetadataError, Result};
pub use models::{CandidateAuthor, CandidateBook, SearchPage};
pub use providers::{BookSearchProvider, GutendexClient};
