//! Order Repository
//!
//! Write helpers take any executor so the checkout engine and the status
//! workflow can run them on their transaction. Read helpers take the pool.

use super::RepoResult;
use shared::models::{
    ActorKind, Order, OrderItem, OrderStatus, OrderStatusHistory, OrderSummary, PaymentStatus,
    ShopkeeperOrder, ShopkeeperOrderView,
};
use sqlx::{SqliteExecutor, SqlitePool};

const ORDER_COLUMNS: &str =
    "id, customer_id, total_amount, status, payment_status, shipping_address, created_at, updated_at";

/// Order header to insert
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub id: &'a str,
    pub customer_id: &'a str,
    pub total_amount: f64,
    pub shipping_address: &'a str,
    pub created_at: i64,
}

/// One purchased line, written to both `order_items` and `shopkeeper_orders`
#[derive(Debug, Clone)]
pub struct NewOrderLine<'a> {
    pub product_id: &'a str,
    pub shopkeeper_id: &'a str,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Audit entry to append
#[derive(Debug, Clone)]
pub struct NewHistory<'a> {
    pub order_id: &'a str,
    pub shopkeeper_id: Option<&'a str>,
    pub status: OrderStatus,
    pub note: &'a str,
    pub actor: ActorKind,
}

// ── Writes ──────────────────────────────────────────────────────────

pub async fn insert_order<'c, E>(executor: E, order: &NewOrder<'_>) -> RepoResult<()>
where
    E: SqliteExecutor<'c>,
{
    sqlx::query(
        "INSERT INTO orders (id, customer_id, total_amount, status, payment_status, shipping_address, created_at, updated_at) VALUES (?, ?, ?, 'pending', 'pending', ?, ?, ?)",
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.total_amount)
    .bind(order.shipping_address)
    .bind(order.created_at)
    .bind(order.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_item<'c, E>(
    executor: E,
    order_id: &str,
    line: &NewOrderLine<'_>,
) -> RepoResult<()>
where
    E: SqliteExecutor<'c>,
{
    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(order_id)
    .bind(line.product_id)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(line.subtotal)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_shopkeeper_order<'c, E>(
    executor: E,
    order: &NewOrder<'_>,
    line: &NewOrderLine<'_>,
) -> RepoResult<()>
where
    E: SqliteExecutor<'c>,
{
    sqlx::query(
        "INSERT INTO shopkeeper_orders (order_id, shopkeeper_id, customer_id, product_id, quantity, unit_price, subtotal, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?)",
    )
    .bind(order.id)
    .bind(line.shopkeeper_id)
    .bind(order.customer_id)
    .bind(line.product_id)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(line.subtotal)
    .bind(order.created_at)
    .bind(order.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Take `quantity` units off a product's stock
///
/// Returns `false` when the product no longer has that many units; nothing
/// is written in that case.
pub async fn decrement_stock<'c, E>(
    executor: E,
    product_id: &str,
    quantity: i64,
) -> RepoResult<bool>
where
    E: SqliteExecutor<'c>,
{
    let rows = sqlx::query(
        "UPDATE products SET quantity = quantity - ?, updated_at = ? WHERE id = ? AND quantity >= ?",
    )
    .bind(quantity)
    .bind(shared::util::now_millis())
    .bind(product_id)
    .bind(quantity)
    .execute(executor)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

pub async fn append_history<'c, E>(executor: E, entry: &NewHistory<'_>) -> RepoResult<i64>
where
    E: SqliteExecutor<'c>,
{
    let id = sqlx::query_scalar(
        "INSERT INTO order_status_history (order_id, shopkeeper_id, status, note, actor, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(entry.order_id)
    .bind(entry.shopkeeper_id)
    .bind(entry.status)
    .bind(entry.note)
    .bind(entry.actor)
    .bind(shared::util::now_millis())
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Move a shopkeeper's non-terminal sub-orders of one order to `status`
pub async fn update_shopkeeper_rows<'c, E>(
    executor: E,
    order_id: &str,
    shopkeeper_id: &str,
    status: OrderStatus,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'c>,
{
    let rows = sqlx::query(
        "UPDATE shopkeeper_orders SET status = ?, updated_at = ? \
         WHERE order_id = ? AND shopkeeper_id = ? AND status NOT IN ('delivered', 'cancelled')",
    )
    .bind(status)
    .bind(shared::util::now_millis())
    .bind(order_id)
    .bind(shopkeeper_id)
    .execute(executor)
    .await?
    .rows_affected();
    Ok(rows)
}

pub async fn count_shopkeeper_rows<'c, E>(
    executor: E,
    order_id: &str,
    shopkeeper_id: &str,
) -> RepoResult<i64>
where
    E: SqliteExecutor<'c>,
{
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shopkeeper_orders WHERE order_id = ? AND shopkeeper_id = ?",
    )
    .bind(order_id)
    .bind(shopkeeper_id)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

pub async fn update_order_status<'c, E>(
    executor: E,
    order_id: &str,
    status: OrderStatus,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'c>,
{
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(shared::util::now_millis())
        .bind(order_id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows)
}

/// Copy an order-level status onto all of its sub-orders
pub async fn cascade_status<'c, E>(
    executor: E,
    order_id: &str,
    status: OrderStatus,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'c>,
{
    let rows =
        sqlx::query("UPDATE shopkeeper_orders SET status = ?, updated_at = ? WHERE order_id = ?")
            .bind(status)
            .bind(shared::util::now_millis())
            .bind(order_id)
            .execute(executor)
            .await?
            .rows_affected();
    Ok(rows)
}

pub async fn update_payment_status<'c, E>(
    executor: E,
    order_id: &str,
    status: PaymentStatus,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'c>,
{
    let rows = sqlx::query("UPDATE orders SET payment_status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(shared::util::now_millis())
        .bind(order_id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows)
}

// ── Reads ───────────────────────────────────────────────────────────

pub async fn find_by_id(pool: &SqlitePool, order_id: &str) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

/// Order visible to its customer only
pub async fn find_for_customer(
    pool: &SqlitePool,
    order_id: &str,
    customer_id: &str,
) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? AND customer_id = ?"
    ))
    .bind(order_id)
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn list_items(pool: &SqlitePool, order_id: &str) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT oi.order_id, oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price, oi.subtotal \
         FROM order_items oi JOIN products p ON p.id = oi.product_id \
         WHERE oi.order_id = ? ORDER BY oi.rowid",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn list_shopkeeper_rows(
    pool: &SqlitePool,
    order_id: &str,
) -> RepoResult<Vec<ShopkeeperOrder>> {
    let rows = sqlx::query_as::<_, ShopkeeperOrder>(
        "SELECT id, order_id, shopkeeper_id, customer_id, product_id, quantity, unit_price, subtotal, status, created_at, updated_at \
         FROM shopkeeper_orders WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Audit trail in append order
pub async fn list_history(
    pool: &SqlitePool,
    order_id: &str,
) -> RepoResult<Vec<OrderStatusHistory>> {
    let history = sqlx::query_as::<_, OrderStatusHistory>(
        "SELECT id, order_id, shopkeeper_id, status, note, actor, created_at \
         FROM order_status_history WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(history)
}

/// A customer's orders, newest first, with line and unit counts
pub async fn list_for_customer(
    pool: &SqlitePool,
    customer_id: &str,
) -> RepoResult<Vec<OrderSummary>> {
    let orders = sqlx::query_as::<_, OrderSummary>(
        "SELECT o.id, o.total_amount, o.status, o.payment_status, o.shipping_address, o.created_at, \
                COALESCE(SUM(oi.quantity), 0) AS items_count, COUNT(oi.product_id) AS line_count \
         FROM orders o LEFT JOIN order_items oi ON oi.order_id = o.id \
         WHERE o.customer_id = ? \
         GROUP BY o.id \
         ORDER BY o.created_at DESC, o.id DESC",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// One page of a shopkeeper's sub-orders plus the unpaged total
pub async fn list_shopkeeper_orders(
    pool: &SqlitePool,
    shopkeeper_id: &str,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<(Vec<ShopkeeperOrderView>, i64)> {
    let rows = sqlx::query_as::<_, ShopkeeperOrderView>(
        "SELECT so.id, so.order_id, so.product_id, p.name AS product_name, so.customer_id, \
                a.full_name AS customer_name, so.quantity, so.unit_price, so.subtotal, so.status, \
                o.payment_status, o.shipping_address, so.created_at, so.updated_at \
         FROM shopkeeper_orders so \
         JOIN products p ON p.id = so.product_id \
         JOIN accounts a ON a.id = so.customer_id \
         JOIN orders o ON o.id = so.order_id \
         WHERE so.shopkeeper_id = ? AND (? IS NULL OR so.status = ?) \
         ORDER BY so.created_at DESC, so.id DESC \
         LIMIT ? OFFSET ?",
    )
    .bind(shopkeeper_id)
    .bind(status)
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shopkeeper_orders WHERE shopkeeper_id = ? AND (? IS NULL OR status = ?)",
    )
    .bind(shopkeeper_id)
    .bind(status)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok((rows, total))
}

/// One page of all orders plus the unpaged total
pub async fn list_all(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    limit: i64,
    offset: i64,
) -> RepoResult<(Vec<Order>, i64)> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE (? IS NULL OR status = ?) \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
    ))
    .bind(status)
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE (? IS NULL OR status = ?)")
        .bind(status)
        .bind(status)
        .fetch_one(pool)
        .await?;

    Ok((orders, total))
}

// ── Statistics ──────────────────────────────────────────────────────

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Sum of order totals, cancelled orders excluded
pub async fn revenue(pool: &SqlitePool) -> RepoResult<f64> {
    let total = sqlx::query_scalar(
        "SELECT CAST(COALESCE(SUM(total_amount), 0) AS REAL) FROM orders WHERE status != 'cancelled'",
    )
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Order count per status; statuses with no orders are omitted
pub async fn count_by_status(pool: &SqlitePool) -> RepoResult<Vec<(OrderStatus, i64)>> {
    let rows = sqlx::query_as::<_, (OrderStatus, i64)>(
        "SELECT status, COUNT(*) FROM orders GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
