//! # Repository Pattern Implementation
//!
//! Repository traits and their SQLite implementations for the catalog.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - Inserts keyed on a unique column resolve conflicts in the database and
//!   report whether the row was created or already stored
//!
//! ## Available Repositories
//!
//! - `AuthorRepository` - Authors, unique by name
//! - `BookRepository` - Books, unique by title, each owned by one author

pub mod author;
pub mod book;

pub use author::{AuthorRepository, SqliteAuthorRepository};
pub use book::{BookRepository, SqliteBookRepository};

/// Result of an insert against a unique key
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    /// The row did not exist and was inserted
    Created(T),
    /// A row with the same key was already stored; it is returned unchanged
    Existing(T),
}

impl<T> Resolved<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Resolved::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Resolved::Created(value) | Resolved::Existing(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Resolved::Created(value) | Resolved::Existing(value) => value,
        }
    }
}
