//! Cart Repository
//!
//! One row per (customer, product). Quantities written here are always
//! clamped to the product's stock at the time of the write; checkout still
//! re-checks stock inside its own transaction.

use super::{RepoError, RepoResult};
use shared::models::{CartAdd, CartLineDetail};
use sqlx::{SqliteExecutor, SqlitePool};

/// Result of adding a product to a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Line now holds this quantity
    Added(i64),
    ProductNotFound,
    OutOfStock,
}

/// Result of setting a line's quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Line now holds this quantity (possibly clamped)
    Updated(i64),
    Removed,
    LineNotFound,
    OutOfStock,
}

const UPSERT_LINE: &str = "INSERT INTO cart_lines (customer_id, product_id, quantity, updated_at) \
     SELECT ?, p.id, MIN(?, p.quantity), ? FROM products p WHERE p.id = ? AND p.quantity > 0 \
     ON CONFLICT (customer_id, product_id) DO UPDATE SET \
        quantity = MIN(cart_lines.quantity + excluded.quantity, \
                       (SELECT quantity FROM products WHERE id = excluded.product_id)), \
        updated_at = excluded.updated_at \
     RETURNING quantity";

/// Cart lines joined with the live product row, oldest first
pub async fn list_cart_lines<'c, E>(
    executor: E,
    customer_id: &str,
) -> RepoResult<Vec<CartLineDetail>>
where
    E: SqliteExecutor<'c>,
{
    let lines = sqlx::query_as::<_, CartLineDetail>(
        "SELECT c.product_id, p.name AS product_name, c.quantity, p.price, p.discount, \
                p.quantity AS stock, p.shopkeeper_id, p.image \
         FROM cart_lines c JOIN products p ON p.id = c.product_id \
         WHERE c.customer_id = ? \
         ORDER BY c.rowid",
    )
    .bind(customer_id)
    .fetch_all(executor)
    .await?;
    Ok(lines)
}

/// Delete every line of a customer's cart, returning how many went
pub async fn clear_cart<'c, E>(executor: E, customer_id: &str) -> RepoResult<u64>
where
    E: SqliteExecutor<'c>,
{
    let rows = sqlx::query("DELETE FROM cart_lines WHERE customer_id = ?")
        .bind(customer_id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows)
}

async fn upsert_line<'c, E>(
    executor: E,
    customer_id: &str,
    item: &CartAdd,
) -> RepoResult<Option<i64>>
where
    E: SqliteExecutor<'c>,
{
    let quantity = sqlx::query_scalar(UPSERT_LINE)
        .bind(customer_id)
        .bind(item.quantity)
        .bind(shared::util::now_millis())
        .bind(&item.product_id)
        .fetch_optional(executor)
        .await?;
    Ok(quantity)
}

async fn product_stock(pool: &SqlitePool, product_id: &str) -> RepoResult<Option<i64>> {
    let stock = sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(stock)
}

/// Add `quantity` units, merging with an existing line and clamping to stock
pub async fn add(pool: &SqlitePool, customer_id: &str, item: &CartAdd) -> RepoResult<AddOutcome> {
    if item.quantity < 1 {
        return Err(RepoError::Validation(format!(
            "quantity must be at least 1, got {}",
            item.quantity
        )));
    }

    if let Some(quantity) = upsert_line(pool, customer_id, item).await? {
        return Ok(AddOutcome::Added(quantity));
    }

    // Nothing written: either the product is unknown or it has no stock
    Ok(match product_stock(pool, &item.product_id).await? {
        None => AddOutcome::ProductNotFound,
        Some(_) => AddOutcome::OutOfStock,
    })
}

/// Set a line's quantity; zero removes it
pub async fn set_quantity(
    pool: &SqlitePool,
    customer_id: &str,
    product_id: &str,
    quantity: i64,
) -> RepoResult<UpdateOutcome> {
    if quantity < 0 {
        return Err(RepoError::Validation(format!(
            "quantity cannot be negative: {quantity}"
        )));
    }
    if quantity == 0 {
        return Ok(match remove(pool, customer_id, product_id).await {
            Ok(()) => UpdateOutcome::Removed,
            Err(RepoError::NotFound(_)) => UpdateOutcome::LineNotFound,
            Err(e) => return Err(e),
        });
    }

    let updated: Option<i64> = sqlx::query_scalar(
        "UPDATE cart_lines SET \
            quantity = MIN(?, (SELECT quantity FROM products WHERE id = cart_lines.product_id)), \
            updated_at = ? \
         WHERE customer_id = ? AND product_id = ? \
           AND (SELECT quantity FROM products WHERE id = cart_lines.product_id) > 0 \
         RETURNING quantity",
    )
    .bind(quantity)
    .bind(shared::util::now_millis())
    .bind(customer_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    if let Some(quantity) = updated {
        return Ok(UpdateOutcome::Updated(quantity));
    }

    let exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM cart_lines WHERE customer_id = ? AND product_id = ?",
    )
    .bind(customer_id)
    .bind(product_id)
    .fetch_one(pool)
    .await?;

    Ok(if exists == 0 {
        UpdateOutcome::LineNotFound
    } else {
        UpdateOutcome::OutOfStock
    })
}

pub async fn remove(pool: &SqlitePool, customer_id: &str, product_id: &str) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM cart_lines WHERE customer_id = ? AND product_id = ?")
        .bind(customer_id)
        .bind(product_id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("Cart item {product_id}")));
    }
    Ok(())
}

/// Replace the whole cart in one transaction
///
/// Unknown and out-of-stock products are skipped, duplicates are merged and
/// every line is clamped to stock. Returns the number of lines kept.
pub async fn sync(pool: &SqlitePool, customer_id: &str, items: &[CartAdd]) -> RepoResult<usize> {
    let mut tx = pool.begin().await?;

    clear_cart(&mut *tx, customer_id).await?;

    let mut kept = std::collections::HashSet::new();
    for item in items.iter().filter(|i| i.quantity >= 1) {
        if upsert_line(&mut *tx, customer_id, item).await?.is_some() {
            kept.insert(item.product_id.as_str());
        } else {
            tracing::debug!(
                customer_id,
                product_id = %item.product_id,
                "Cart sync skipped unavailable product"
            );
        }
    }

    tx.commit().await?;
    Ok(kept.len())
}
