//! External Book Search Providers
//!
//! Clients for services that can be searched for candidate books:
//! - Gutendex - JSON API over the Project Gutenberg catalog

pub mod gutendex;

pub use gutendex::GutendexClient;

use crate::error::Result;
use crate::models::CandidateBook;
use async_trait::async_trait;

/// Free-text book search
#[async_trait]
pub trait BookSearchProvider: Send + Sync {
    /// Search for books matching `query`, in the order the service ranks them.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::NetworkError`](crate::MetadataError::NetworkError)
    ///   or [`MetadataError::HttpError`](crate::MetadataError::HttpError) when
    ///   the service cannot be reached or rejects the request
    /// - [`MetadataError::JsonParse`](crate::MetadataError::JsonParse) when the
    ///   response body cannot be decoded
    async fn search(&self, query: &str) -> Result<Vec<CandidateBook>>;
}
