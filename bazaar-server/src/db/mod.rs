//! Database Module
//!
//! Handles the SQLite connection pool, migrations and the repository
//! functions. Repository functions are free functions taking either a pool
//! or a connection, so the checkout engine can run them inside its own
//! transaction.

pub mod account;
pub mod cart;
pub mod order;
pub mod product;
pub mod sequence;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::core::Config;
use crate::utils::AppError;

/// Writers wait this long for the SQLite write lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Row is still referenced by another table (foreign key)
    #[error("Referenced: {0}")]
    Referenced(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::Referenced(db_err.message().to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Database service owning the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database with WAL, foreign keys and busy_timeout, then migrate
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(
            url = %config.database_url,
            max_connections = config.db_max_connections,
            "Database connection established (SQLite WAL, busy_timeout=5000ms)"
        );

        Self::migrate(pool).await
    }

    /// Private in-memory database with the full schema
    ///
    /// A single connection that never expires, so every query sees the same
    /// database. Callers must not hold a transaction while querying the pool.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        sequence::reconcile_sequences(&pool)
            .await
            .map_err(|e| AppError::database(format!("Id sequence reconcile failed: {e}")))?;

        Ok(Self { pool })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use shared::models::{AccountStatus, Role};

    #[tokio::test]
    async fn test_migrations_create_schema() {
        let pool = test_pool().await;
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name != 'sqlite_sequence' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(
            tables,
            vec![
                "accounts",
                "cart_lines",
                "id_sequences",
                "order_items",
                "order_status_history",
                "orders",
                "products",
                "shopkeeper_orders",
            ]
        );
        assert_eq!(count(&pool, "id_sequences").await, 5);
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_duplicate() {
        let pool = test_pool().await;
        seed_account(&pool, "C11111", Role::Customer, AccountStatus::Active).await;
        let err = sqlx::query(
            "INSERT INTO accounts (id, role, full_name, email, password_hash, status, created_at) VALUES ('C11112', 'customer', 'Dup', 'C11111@EXAMPLE.com', 'x', 'active', 0)",
        )
        .execute(&pool)
        .await
        .unwrap_err();
        assert!(matches!(RepoError::from(err), RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_stock_cannot_go_negative() {
        let pool = test_pool().await;
        seed_account(&pool, "S1111", Role::Shopkeeper, AccountStatus::Active).await;
        seed_product(&pool, "P1111", "S1111", 10.0, 0.0, 1).await;
        let result = sqlx::query("UPDATE products SET quantity = quantity - 2 WHERE id = 'P1111'")
            .execute(&pool)
            .await;
        assert!(result.is_err());
        assert_eq!(stock(&pool, "P1111").await, 1);
    }
}
