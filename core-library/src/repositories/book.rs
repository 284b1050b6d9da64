//! Book repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{AuthorId, Book, BookId, NewBook, NewCatalogEntry};
use crate::repositories::author::find_or_create_on;
use crate::repositories::Resolved;
use async_trait::async_trait;
use sqlx::{query_as, SqliteConnection, SqlitePool};
use tracing::debug;

/// Book repository interface for data access operations
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// Find a book by exact, case-sensitive title
    async fn find_by_title(&self, title: &str) -> Result<Option<Book>>;

    /// Insert the book unless one with the same title is already stored
    ///
    /// # Errors
    /// Returns error if:
    /// - Book validation fails
    /// - The referenced author does not exist
    /// - Database error occurs
    async fn create_if_absent(&self, book: &NewBook) -> Result<Resolved<Book>>;

    /// Resolve the entry's author by name and insert its book, atomically
    ///
    /// When the title is already stored the stored book is returned as
    /// [`Resolved::Existing`] and nothing is written, not even a new author.
    /// On any error the author insert is rolled back as well.
    async fn register(&self, entry: &NewCatalogEntry) -> Result<Resolved<Book>>;

    /// All books in insertion order
    async fn list_all(&self) -> Result<Vec<Book>>;

    /// Books whose language equals `language` exactly
    async fn find_by_language(&self, language: &str) -> Result<Vec<Book>>;

    /// Books owned by the given author
    async fn find_by_author(&self, author_id: AuthorId) -> Result<Vec<Book>>;

    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of BookRepository
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let book = query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Book>> {
        let book = query_as::<_, Book>("SELECT * FROM books WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn create_if_absent(&self, book: &NewBook) -> Result<Resolved<Book>> {
        let mut conn = self.pool.acquire().await?;
        create_if_absent_on(&mut conn, book).await
    }

    async fn register(&self, entry: &NewCatalogEntry) -> Result<Resolved<Book>> {
        let mut tx = self.pool.begin().await?;

        let author = find_or_create_on(&mut tx, &entry.author).await?;
        let book = create_if_absent_on(&mut tx, &entry.book_for(author.get().id)).await?;

        if book.is_created() {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }
        Ok(book)
    }

    async fn list_all(&self) -> Result<Vec<Book>> {
        let books = query_as::<_, Book>("SELECT * FROM books ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn find_by_language(&self, language: &str) -> Result<Vec<Book>> {
        let books = query_as::<_, Book>("SELECT * FROM books WHERE language = ? ORDER BY id ASC")
            .bind(language)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn find_by_author(&self, author_id: AuthorId) -> Result<Vec<Book>> {
        let books = query_as::<_, Book>("SELECT * FROM books WHERE author_id = ? ORDER BY id ASC")
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

async fn create_if_absent_on(
    conn: &mut SqliteConnection,
    book: &NewBook,
) -> Result<Resolved<Book>> {
    book.validate().map_err(|e| LibraryError::InvalidInput {
        field: "Book".to_string(),
        message: e,
    })?;

    let inserted = query_as::<_, Book>(
        r#"
        INSERT INTO books (title, language, download_count, author_id, created_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (title) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(&book.title)
    .bind(&book.language)
    .bind(book.download_count)
    .bind(book.author_id)
    .bind(chrono::Utc::now().timestamp())
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(created) = inserted {
        debug!(book_id = %created.id, title = %created.title, "Book created");
        return Ok(Resolved::Created(created));
    }

    let existing = query_as::<_, Book>("SELECT * FROM books WHERE title = ?")
        .bind(&book.title)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| LibraryError::NotFound {
            entity_type: "Book".to_string(),
            key: book.title.clone(),
        })?;

    debug!(book_id = %existing.id, title = %existing.title, "Book already stored");
    Ok(Resolved::Existing(existing))
}
