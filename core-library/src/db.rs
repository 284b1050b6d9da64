//! # Database Connection Pool Module
//!
//! SQLite connection pooling for the catalog store.
//!
//! ## Features
//!
//! - **WAL Mode**: concurrent readers alongside the single writer
//! - **Foreign Keys**: every book must reference a stored author
//! - **Automatic Migrations**: the schema is applied when the pool is created
//! - **Health Checks**: connection validation on startup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_library::db::{DatabaseConfig, create_pool};
//!
//! let pool = create_pool(DatabaseConfig::new("literalura.db")).await?;
//! ```
//!
//! ## Testing
//!
//! ```rust,ignore
//! let pool = create_test_pool().await?;
//! ```

use crate::{LibraryError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Database configuration for SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `sqlite:` URL of the database file, or `sqlite::memory:`
    pub database_url: String,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Maximum time to wait for a connection from the pool
    pub acquire_timeout: Duration,

    /// Maximum lifetime of a connection
    pub max_lifetime: Option<Duration>,

    /// Maximum idle time for a connection before being closed
    pub idle_timeout: Option<Duration>,

    /// Number of prepared statements cached per connection
    pub statement_cache_capacity: usize,
}

impl DatabaseConfig {
    /// Configuration for a database file at `database_path`, created on first
    /// use.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        let path = database_path.into();
        let database_url = format!("sqlite:{}", path.display());

        Self {
            database_url,
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Some(Duration::from_secs(1800)),
            idle_timeout: Some(Duration::from_secs(600)),
            statement_cache_capacity: 100,
        }
    }

    /// Configuration for a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` opens its own empty database, so
    /// the pool is pinned to a single connection that never expires.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: None,
            idle_timeout: None,
            statement_cache_capacity: 100,
        }
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.statement_cache_capacity = capacity;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Create a configured SQLite connection pool
///
/// Opens (or creates) the database, applies pending migrations and runs a
/// health check before handing the pool out.
///
/// # Errors
///
/// Returns an error if:
/// - The database file cannot be opened or created
/// - Migrations fail
/// - Health check fails
pub async fn create_pool(config: DatabaseConfig) -> Result<Pool<Sqlite>> {
    info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Creating database connection pool"
    );

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(LibraryError::Database)?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .pragma("cache_size", "-16000")
        .statement_cache_capacity(config.statement_cache_capacity);

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create connection pool");
            LibraryError::Database(e)
        })?;

    debug!(connections = pool.size(), "Database connection pool created");

    run_migrations(&pool).await?;
    health_check(&pool).await?;

    Ok(pool)
}

/// In-memory pool with the schema applied.
pub async fn create_test_pool() -> Result<Pool<Sqlite>> {
    create_pool(DatabaseConfig::in_memory()).await
}

async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    debug!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Migration failed");
            LibraryError::Migration(e.to_string())
        })?;

    info!("Database schema is up to date");
    Ok(())
}

/// Verify the pool can serve a trivial query.
pub async fn health_check(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| {
        warn!(error = %e, "Database health check failed");
        LibraryError::Database(e)
    })?;

    debug!("Database health check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_test_pool() {
        let pool = create_test_pool().await;
        assert!(pool.is_ok(), "Should create test pool successfully");
    }

    #[tokio::test]
    async fn test_health_check() {
        let pool = create_test_pool().await.unwrap();
        assert!(health_check(&pool).await.is_ok());
    }

    #[test]
    fn test_database_config_builder() {
        let config = DatabaseConfig::new("catalog.db")
            .min_connections(2)
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(60))
            .statement_cache_capacity(200);

        assert_eq!(config.database_url, "sqlite:catalog.db");
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(60));
        assert_eq!(config.statement_cache_capacity, 200);
    }

    #[test]
    fn test_in_memory_uses_single_connection() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
        assert!(config.max_lifetime.is_none());
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = create_test_pool().await.unwrap();

        let result: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(result.0, 1, "Foreign keys should be enabled");
    }

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let pool = create_test_pool().await.unwrap();

        for table in ["authors", "books"] {
            let result: (i32,) =
                sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?")
                    .bind(table)
                    .fetch_one(&pool)
                    .await
                    .unwrap();

            assert_eq!(result.0, 1, "{} table should exist", table);
        }
    }

    #[tokio::test]
    async fn test_book_requires_existing_author() {
        let pool = create_test_pool().await.unwrap();

        let result = sqlx::query(
            "INSERT INTO books (title, language, download_count, author_id, created_at) \
             VALUES ('Orphan', 'en', NULL, 999, 0)",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err(), "Dangling author reference must be rejected");
    }

    #[tokio::test]
    async fn test_file_database_persists_across_pools() {
        let dir = std::env::temp_dir().join(format!(
            "literalura-db-test-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.db");

        {
            let pool = create_pool(DatabaseConfig::new(&path)).await.unwrap();
            sqlx::query(
                "INSERT INTO authors (name, birth_year, death_year, created_at) \
                 VALUES ('Austen, Jane', 1775, 1817, 0)",
            )
            .execute(&pool)
            .await
            .unwrap();
            pool.close().await;
        }

        let pool = create_pool(DatabaseConfig::new(&path)).await.unwrap();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM authors")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);

        pool.close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }
}
