//! Checkout: turn a customer's cart into an order
//!
//! Everything happens in one SQLite transaction. The first statement reserves
//! the order id, which is a write and therefore takes the database write lock
//! before any stock is read; no other writer can interleave until commit.
//! Any early return drops the transaction, which rolls back every write
//! (including the id reservation) and leaves the cart untouched.

use std::time::Duration;

use rust_decimal::Decimal;
use shared::models::{ActorKind, CartLineDetail, CheckoutResponse, OrderStatus};
use sqlx::SqlitePool;

use super::error::OrderError;
use super::money;
use crate::db::RepoError;
use crate::db::cart as cart_repo;
use crate::db::order::{self as order_repo, NewHistory, NewOrder, NewOrderLine};
use crate::db::sequence::{self, IdKind};
use crate::utils::validation::MAX_ADDRESS_LEN;

/// History note written for every new order
pub const ORDER_PLACED_NOTE: &str = "Order placed";

/// A cart line priced at checkout time
struct PricedLine<'a> {
    line: &'a CartLineDetail,
    unit_price: Decimal,
    subtotal: Decimal,
}

fn insufficient(line: &CartLineDetail, available: i64) -> OrderError {
    OrderError::InsufficientStock {
        product_id: line.product_id.clone(),
        product_name: line.product_name.clone(),
        requested: line.quantity,
        available,
    }
}

/// Unique violations while writing a freshly reserved order are server faults
fn write_error(order_id: &str, err: RepoError) -> OrderError {
    match err {
        RepoError::Duplicate(msg) => {
            OrderError::Internal(format!("order {order_id} collides with an existing row: {msg}"))
        }
        other => OrderError::Repo(other),
    }
}

/// Place an order from the customer's cart
///
/// Fails with [`OrderError::Timeout`] when the transaction does not finish
/// within `timeout`; the transaction is rolled back and the call may be
/// retried as is. The server never retries on its own.
pub async fn checkout(
    pool: &SqlitePool,
    customer_id: &str,
    shipping_address: &str,
    timeout: Duration,
) -> Result<CheckoutResponse, OrderError> {
    let shipping_address = shipping_address.trim();
    if shipping_address.is_empty() {
        return Err(OrderError::Validation("shipping_address is required".into()));
    }
    if shipping_address.len() > MAX_ADDRESS_LEN {
        return Err(OrderError::Validation(format!(
            "shipping_address is too long (max {MAX_ADDRESS_LEN})"
        )));
    }

    let placed = place_order(pool, customer_id, shipping_address);
    match tokio::time::timeout(timeout, placed).await {
        Ok(Ok(response)) => {
            tracing::info!(
                order_id = %response.order_id,
                customer_id,
                total_amount = response.total_amount,
                items_count = response.items_count,
                "Order placed"
            );
            Ok(response)
        }
        Ok(Err(e)) => {
            match &e {
                OrderError::InsufficientStock {
                    product_id,
                    requested,
                    available,
                    ..
                } => tracing::warn!(
                    customer_id,
                    product_id = %product_id,
                    requested,
                    available,
                    "Checkout refused: insufficient stock"
                ),
                OrderError::EmptyCart => {
                    tracing::debug!(customer_id, "Checkout refused: empty cart")
                }
                other => tracing::error!(customer_id, error = %other, "Checkout failed"),
            }
            Err(e)
        }
        Err(_) => {
            tracing::warn!(
                customer_id,
                timeout_ms = timeout.as_millis() as u64,
                "Checkout timed out, rolled back"
            );
            Err(OrderError::Timeout)
        }
    }
}

async fn place_order(
    pool: &SqlitePool,
    customer_id: &str,
    shipping_address: &str,
) -> Result<CheckoutResponse, OrderError> {
    let mut tx = pool.begin().await?;

    let order_id = sequence::next_id(&mut *tx, IdKind::Order).await?;

    let lines = cart_repo::list_cart_lines(&mut *tx, customer_id).await?;
    if lines.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    // Check every line before writing anything
    if let Some(short) = lines.iter().find(|l| l.quantity > l.stock) {
        return Err(insufficient(short, short.stock));
    }

    let priced: Vec<PricedLine<'_>> = lines
        .iter()
        .map(|line| {
            let unit_price = money::unit_price(line.price, line.discount);
            PricedLine {
                line,
                unit_price,
                subtotal: money::line_subtotal(unit_price, line.quantity),
            }
        })
        .collect();
    let total = money::sum(priced.iter().map(|p| p.subtotal));
    let items_count: i64 = lines.iter().map(|l| l.quantity).sum();

    let order = NewOrder {
        id: &order_id,
        customer_id,
        total_amount: money::to_f64(total),
        shipping_address,
        created_at: shared::util::now_millis(),
    };
    order_repo::insert_order(&mut *tx, &order)
        .await
        .map_err(|e| write_error(&order_id, e))?;

    for p in &priced {
        let new_line = NewOrderLine {
            product_id: &p.line.product_id,
            shopkeeper_id: &p.line.shopkeeper_id,
            quantity: p.line.quantity,
            unit_price: money::to_f64(p.unit_price),
            subtotal: money::to_f64(p.subtotal),
        };
        order_repo::insert_item(&mut *tx, &order_id, &new_line)
            .await
            .map_err(|e| write_error(&order_id, e))?;
        order_repo::insert_shopkeeper_order(&mut *tx, &order, &new_line)
            .await
            .map_err(|e| write_error(&order_id, e))?;

        if !order_repo::decrement_stock(&mut *tx, &p.line.product_id, p.line.quantity).await? {
            return Err(insufficient(p.line, p.line.stock));
        }
    }

    cart_repo::clear_cart(&mut *tx, customer_id).await?;

    order_repo::append_history(
        &mut *tx,
        &NewHistory {
            order_id: &order_id,
            shopkeeper_id: None,
            status: OrderStatus::Pending,
            note: ORDER_PLACED_NOTE,
            actor: ActorKind::System,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(CheckoutResponse {
        total_amount: order.total_amount,
        order_id,
        items_count,
    })
}
