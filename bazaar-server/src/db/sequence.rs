//! Prefixed id sequences
//!
//! Every entity kind has one row in `id_sequences`. Issuing an id is a single
//! `UPDATE ... RETURNING` on the caller's connection, so two writers can never
//! observe the same value, and an id reserved inside a transaction that later
//! rolls back is handed out again.

use super::{RepoError, RepoResult};
use sqlx::{SqliteExecutor, SqlitePool};

/// Entity kinds with their own id sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Customer,
    Shopkeeper,
    Admin,
    Product,
    Order,
}

impl IdKind {
    pub const ALL: [IdKind; 5] = [
        Self::Customer,
        Self::Shopkeeper,
        Self::Admin,
        Self::Product,
        Self::Order,
    ];

    /// Key in `id_sequences.kind`
    pub fn key(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Shopkeeper => "shopkeeper",
            Self::Admin => "admin",
            Self::Product => "product",
            Self::Order => "order",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Customer => "C",
            Self::Shopkeeper => "S",
            Self::Admin => "A",
            Self::Product => "P",
            Self::Order => "ORD",
        }
    }

    /// First id issued on an empty table
    pub fn seed(&self) -> i64 {
        match self {
            Self::Customer => 11111,
            Self::Shopkeeper => 1111,
            Self::Admin => 111,
            Self::Product => 1111,
            Self::Order => 10001,
        }
    }

    /// Table holding ids of this kind, plus an optional row filter
    fn source(&self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::Customer => ("accounts", Some("role = 'customer'")),
            Self::Shopkeeper => ("accounts", Some("role = 'shopkeeper'")),
            Self::Admin => ("accounts", Some("role = 'admin'")),
            Self::Product => ("products", None),
            Self::Order => ("orders", None),
        }
    }
}

impl From<shared::models::Role> for IdKind {
    fn from(role: shared::models::Role) -> Self {
        match role {
            shared::models::Role::Customer => Self::Customer,
            shared::models::Role::Shopkeeper => Self::Shopkeeper,
            shared::models::Role::Admin => Self::Admin,
        }
    }
}

/// Format a sequence value as an id
pub fn format_id(kind: IdKind, value: i64) -> String {
    format!("{}{}", kind.prefix(), value)
}

/// Issue the next id for `kind`
///
/// Runs on whatever connection is passed in; inside a transaction this is
/// also the statement that takes SQLite's write lock.
pub async fn next_id<'c, E>(executor: E, kind: IdKind) -> RepoResult<String>
where
    E: SqliteExecutor<'c>,
{
    let value: Option<i64> = sqlx::query_scalar(
        "UPDATE id_sequences SET last_value = last_value + 1 WHERE kind = ? RETURNING last_value",
    )
    .bind(kind.key())
    .fetch_optional(executor)
    .await?;

    value
        .map(|v| format_id(kind, v))
        .ok_or_else(|| RepoError::Database(format!("id sequence '{}' missing", kind.key())))
}

/// Raise every counter to at least the highest numeric suffix already stored
///
/// Rows imported without going through [`next_id`] would otherwise collide
/// with freshly issued ids.
pub async fn reconcile_sequences(pool: &SqlitePool) -> RepoResult<()> {
    for kind in IdKind::ALL {
        let (table, filter) = kind.source();
        let prefix_len = kind.prefix().len() as i64;
        let filter = filter.map(|f| format!(" AND {f}")).unwrap_or_default();
        let sql = format!(
            "SELECT MAX(CAST(SUBSTR(id, ? + 1) AS INTEGER)) FROM {table} WHERE id LIKE ? || '%'{filter}"
        );

        let max_existing: Option<i64> = sqlx::query_scalar(&sql)
            .bind(prefix_len)
            .bind(kind.prefix())
            .fetch_one(pool)
            .await?;

        if let Some(max_existing) = max_existing {
            let raised = sqlx::query(
                "UPDATE id_sequences SET last_value = ? WHERE kind = ? AND last_value < ?",
            )
            .bind(max_existing)
            .bind(kind.key())
            .bind(max_existing)
            .execute(pool)
            .await?
            .rows_affected();

            if raised > 0 {
                tracing::info!(
                    kind = kind.key(),
                    last_value = max_existing,
                    "Id sequence raised to existing data"
                );
            }
        }
    }
    Ok(())
}
