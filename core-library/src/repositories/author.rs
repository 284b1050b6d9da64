//! Author repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{Author, AuthorId, NewAuthor};
use crate::repositories::Resolved;
use async_trait::async_trait;
use sqlx::{query_as, SqliteConnection, SqlitePool};
use tracing::debug;

/// Author repository interface for data access operations
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Find an author by its store-assigned ID
    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>>;

    /// Find an author by exact, case-sensitive name
    async fn find_by_name(&self, name: &str) -> Result<Option<Author>>;

    /// Insert the author unless one with the same name is already stored
    ///
    /// On a name conflict the stored author is returned as
    /// [`Resolved::Existing`]; its birth and death years are left untouched.
    ///
    /// # Errors
    /// Returns error if:
    /// - Author validation fails
    /// - Database error occurs
    async fn find_or_create(&self, author: &NewAuthor) -> Result<Resolved<Author>>;

    /// All authors in insertion order
    async fn list_all(&self) -> Result<Vec<Author>>;

    /// Authors with `birth_year <= year < death_year`
    ///
    /// Authors with an unknown birth or death year are never returned.
    async fn alive_in_year(&self, year: i32) -> Result<Vec<Author>>;

    /// Count total authors
    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of AuthorRepository
pub struct SqliteAuthorRepository {
    pool: SqlitePool,
}

impl SqliteAuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for SqliteAuthorRepository {
    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>> {
        let author = query_as::<_, Author>("SELECT * FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(author)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Author>> {
        let author = query_as::<_, Author>("SELECT * FROM authors WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(author)
    }

    async fn find_or_create(&self, author: &NewAuthor) -> Result<Resolved<Author>> {
        let mut conn = self.pool.acquire().await?;
        find_or_create_on(&mut conn, author).await
    }

    async fn list_all(&self) -> Result<Vec<Author>> {
        let authors = query_as::<_, Author>("SELECT * FROM authors ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(authors)
    }

    async fn alive_in_year(&self, year: i32) -> Result<Vec<Author>> {
        let authors = query_as::<_, Author>(
            r#"
            SELECT * FROM authors
            WHERE birth_year IS NOT NULL
              AND death_year IS NOT NULL
              AND birth_year <= ?
              AND death_year > ?
            ORDER BY id ASC
            "#,
        )
        .bind(year)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = query_as("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

/// Insert `author` on `conn` unless the name is taken, else fetch the stored row.
///
/// Shared by the repository and by catalog transactions.
pub(crate) async fn find_or_create_on(
    conn: &mut SqliteConnection,
    author: &NewAuthor,
) -> Result<Resolved<Author>> {
    author.validate().map_err(|e| LibraryError::InvalidInput {
        field: "Author".to_string(),
        message: e,
    })?;

    // RETURNING yields no row when the insert is skipped on conflict.
    let inserted = query_as::<_, Author>(
        r#"
        INSERT INTO authors (name, birth_year, death_year, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (name) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(&author.name)
    .bind(author.birth_year)
    .bind(author.death_year)
    .bind(chrono::Utc::now().timestamp())
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(created) = inserted {
        debug!(author_id = %created.id, name = %created.name, "Author created");
        return Ok(Resolved::Created(created));
    }

    let existing = query_as::<_, Author>("SELECT * FROM authors WHERE name = ?")
        .bind(&author.name)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| LibraryError::NotFound {
            entity_type: "Author".to_string(),
            key: author.name.clone(),
        })?;

    debug!(author_id = %existing.id, name = %existing.name, "Author already stored");
    Ok(Resolved::Existing(existing))
}
