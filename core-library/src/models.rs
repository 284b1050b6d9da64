//! Domain models for the book catalog
//!
//! Persisted rows carry store-assigned numeric keys. The `New*` types are the
//! insert payloads handed to the repositories before a key exists.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for an author, assigned by the store
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct AuthorId(pub i64);

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a book, assigned by the store
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct BookId(pub i64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Domain Models
// =============================================================================

/// Author of one or more catalogued books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: AuthorId,
    /// Display name, unique across the catalog (exact, case-sensitive)
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub created_at: i64,
}

/// Insert payload for [`Author`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>, birth_year: Option<i32>, death_year: Option<i32>) -> Self {
        Self {
            name: name.into(),
            birth_year,
            death_year,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Author name cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Catalogued book, owned by exactly one author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: BookId,
    /// Title, unique across the catalog (exact, case-sensitive)
    pub title: String,
    /// Primary language code as reported by the search service
    pub language: String,
    pub download_count: Option<f64>,
    pub author_id: AuthorId,
    pub created_at: i64,
}

/// Insert payload for [`Book`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub language: String,
    pub download_count: Option<f64>,
    pub author_id: AuthorId,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        language: impl Into<String>,
        download_count: Option<f64>,
        author_id: AuthorId,
    ) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            download_count,
            author_id,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Book title cannot be empty".to_string());
        }

        if self.language.trim().is_empty() {
            return Err("Book language cannot be empty".to_string());
        }

        if let Some(count) = self.download_count {
            if !count.is_finite() || count < 0.0 {
                return Err(format!("Invalid download count: {}", count));
            }
        }

        Ok(())
    }
}

/// A book together with the author who owns it, written as one unit.
///
/// The author is matched by exact name and created only when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCatalogEntry {
    pub author: NewAuthor,
    pub title: String,
    pub language: String,
    pub download_count: Option<f64>,
}

impl NewCatalogEntry {
    pub fn new(
        author: NewAuthor,
        title: impl Into<String>,
        language: impl Into<String>,
        download_count: Option<f64>,
    ) -> Self {
        Self {
            author,
            title: title.into(),
            language: language.into(),
            download_count,
        }
    }

    /// Book payload once the owning author has a key
    pub fn book_for(&self, author_id: AuthorId) -> NewBook {
        NewBook::new(
            self.title.clone(),
            self.language.clone(),
            self.download_count,
            author_id,
        )
    }
}
