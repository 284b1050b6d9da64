//! Catalog service façade.
//!
//! Wires the book search provider, the ingestion engine and the catalog
//! queries into the single entry point used by the command-line front end.
//! Operations run one at a time; each either completes or returns a
//! [`CoreError`] describing why it could not.

pub mod error;
pub mod reconcile;

pub use error::{CoreError, Result};
pub use reconcile::{IngestOutcome, IngestReport, Reconciler};

use core_library::models::Author;
use core_library::query::{AuthorBookCount, BookListItem, LanguageCount, LibraryQueryService};
use core_library::repositories::SqliteBookRepository;
use core_metadata::BookSearchProvider;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, instrument};

/// Language codes accepted by [`CatalogService::books_by_language`].
pub const SUPPORTED_LANGUAGES: [&str; 4] = ["es", "en", "fr", "pt"];

/// Normalise a user-supplied language code and check it is supported.
pub fn parse_language(input: &str) -> Result<&'static str> {
    let code = input.trim().to_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .copied()
        .find(|supported| *supported == code)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "unsupported language '{}', expected one of: {}",
                input.trim(),
                SUPPORTED_LANGUAGES.join(", ")
            ))
        })
}

/// Primary façade exposed to the front end.
pub struct CatalogService {
    search: Arc<dyn BookSearchProvider>,
    reconciler: Reconciler,
    queries: LibraryQueryService,
}

impl CatalogService {
    /// Build the service over a migrated catalog database.
    pub fn new(pool: SqlitePool, search: Arc<dyn BookSearchProvider>) -> Self {
        let reconciler = Reconciler::new(Arc::new(SqliteBookRepository::new(pool.clone())));
        Self::with_components(search, reconciler, LibraryQueryService::new(pool))
    }

    pub fn with_components(
        search: Arc<dyn BookSearchProvider>,
        reconciler: Reconciler,
        queries: LibraryQueryService,
    ) -> Self {
        Self {
            search,
            reconciler,
            queries,
        }
    }

    /// Search by title and register the first result whose title contains
    /// `title`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] for a blank title
    /// - [`CoreError::SearchUnavailable`] / [`CoreError::MalformedResponse`]
    ///   when the search fails
    /// - [`CoreError::NotFound`] when no result matches
    #[instrument(skip(self))]
    pub async fn register_by_title(&self, title: &str) -> Result<IngestOutcome> {
        let title = non_blank(title, "book title")?;
        let candidates = self.search.search(title).await?;
        let outcome = self.reconciler.ingest_one(&candidates, title).await?;
        info!(%outcome, "Title registration finished");
        Ok(outcome)
    }

    /// Search by author and register every result returned.
    ///
    /// An empty search result yields an empty report.
    #[instrument(skip(self))]
    pub async fn register_by_author(&self, author: &str) -> Result<IngestReport> {
        let author = non_blank(author, "author name")?;
        let candidates = self.search.search(author).await?;
        self.reconciler.ingest(&candidates).await
    }

    pub async fn list_books(&self) -> Result<Vec<BookListItem>> {
        Ok(self.queries.list_all_books().await?)
    }

    pub async fn find_book(&self, title: &str) -> Result<Option<BookListItem>> {
        Ok(self.queries.find_book_by_title(title).await?)
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        Ok(self.queries.list_all_authors().await?)
    }

    /// Authors with `birth_year <= year < death_year`.
    pub async fn authors_alive_in_year(&self, year: i32) -> Result<Vec<Author>> {
        Ok(self.queries.authors_alive_in_year(year).await?)
    }

    /// Books stored under one of [`SUPPORTED_LANGUAGES`]. The code is trimmed
    /// and lower-cased first.
    #[instrument(skip(self))]
    pub async fn books_by_language(&self, language: &str) -> Result<Vec<BookListItem>> {
        let code = parse_language(language)?;
        Ok(self.queries.books_by_language(code).await?)
    }

    /// Books whose author's name contains `fragment`.
    pub async fn books_by_author_name(&self, fragment: &str) -> Result<Vec<BookListItem>> {
        let fragment = non_blank(fragment, "author name")?;
        Ok(self.queries.books_by_author_name_contains(fragment).await?)
    }

    pub async fn count_books_by_language(&self) -> Result<Vec<LanguageCount>> {
        Ok(self.queries.count_books_by_language().await?)
    }

    pub async fn count_books_by_author(&self) -> Result<Vec<AuthorBookCount>> {
        Ok(self.queries.count_books_by_author().await?)
    }

    pub async fn top10_by_downloads(&self) -> Result<Vec<BookListItem>> {
        Ok(self.queries.top10_by_downloads().await?)
    }
}

fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{} cannot be empty", what)));
    }
    Ok(trimmed)
}
