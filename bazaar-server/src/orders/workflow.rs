//! Order status workflow
//!
//! Sub-orders move `pending → processing → shipped → delivered`, with
//! `cancelled` reachable from any non-terminal state. Shopkeepers may only set
//! `processing`, `shipped` or `cancelled` on their own rows. Admins set the
//! order-level status to any value and it is copied onto every sub-order.
//! The order-level status is never derived from sub-order statuses.
//!
//! Each accepted transition appends exactly one history row in the same
//! transaction as the status write.

use shared::models::{ActorKind, Order, OrderStatus, PaymentStatus};
use sqlx::SqlitePool;

use super::error::OrderError;
use crate::db::order::{self as order_repo, NewHistory};
use crate::utils::validation::MAX_NOTE_LEN;

fn parse_status(value: &str) -> Result<OrderStatus, OrderError> {
    value
        .trim()
        .parse::<OrderStatus>()
        .map_err(|_| OrderError::InvalidStatus(value.to_string()))
}

fn history_note(note: Option<&str>, status: OrderStatus) -> Result<String, OrderError> {
    match note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) if n.len() > MAX_NOTE_LEN => Err(OrderError::Validation(format!(
            "note is too long (max {MAX_NOTE_LEN})"
        ))),
        Some(n) => Ok(n.to_string()),
        None => Ok(format!("Status updated to {status}")),
    }
}

/// Move a shopkeeper's rows of one order to `status`
///
/// Returns the number of sub-order rows changed. Rows already delivered or
/// cancelled are left alone; if that leaves nothing to change the call fails
/// with [`OrderError::InvalidStatus`].
pub async fn advance_shopkeeper_order(
    pool: &SqlitePool,
    shopkeeper_id: &str,
    order_id: &str,
    status: &str,
    note: Option<&str>,
) -> Result<u64, OrderError> {
    let new_status = parse_status(status)?;
    if !new_status.shopkeeper_settable() {
        return Err(OrderError::InvalidStatus(format!(
            "{new_status} (allowed: processing, shipped, cancelled)"
        )));
    }
    let note = history_note(note, new_status)?;

    let mut tx = pool.begin().await?;

    let updated =
        order_repo::update_shopkeeper_rows(&mut *tx, order_id, shopkeeper_id, new_status).await?;
    if updated == 0 {
        let owned = order_repo::count_shopkeeper_rows(&mut *tx, order_id, shopkeeper_id).await?;
        return Err(if owned == 0 {
            OrderError::NotFound(order_id.to_string())
        } else {
            OrderError::InvalidStatus(format!(
                "{new_status} (items already delivered or cancelled)"
            ))
        });
    }

    order_repo::append_history(
        &mut *tx,
        &NewHistory {
            order_id,
            shopkeeper_id: Some(shopkeeper_id),
            status: new_status,
            note: &note,
            actor: ActorKind::Shopkeeper,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        order_id,
        shopkeeper_id,
        status = %new_status,
        rows = updated,
        "Sub-order status updated"
    );
    Ok(updated)
}

/// Force an order's overall status and copy it onto every sub-order
///
/// Any status is accepted, including moves out of a terminal state.
pub async fn set_order_status(
    pool: &SqlitePool,
    order_id: &str,
    status: &str,
    note: Option<&str>,
) -> Result<Order, OrderError> {
    let new_status = parse_status(status)?;
    let note = history_note(note, new_status)?;

    let mut tx = pool.begin().await?;

    if order_repo::update_order_status(&mut *tx, order_id, new_status).await? == 0 {
        return Err(OrderError::NotFound(order_id.to_string()));
    }
    let cascaded = order_repo::cascade_status(&mut *tx, order_id, new_status).await?;

    order_repo::append_history(
        &mut *tx,
        &NewHistory {
            order_id,
            shopkeeper_id: None,
            status: new_status,
            note: &note,
            actor: ActorKind::Admin,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        order_id,
        status = %new_status,
        sub_orders = cascaded,
        "Order status set by admin"
    );

    order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
}

/// Set the payment flag; no history entry is written
pub async fn set_payment_status(
    pool: &SqlitePool,
    order_id: &str,
    status: &str,
) -> Result<Order, OrderError> {
    let new_status = status
        .trim()
        .parse::<PaymentStatus>()
        .map_err(|_| OrderError::InvalidPaymentStatus(status.to_string()))?;

    if order_repo::update_payment_status(pool, order_id, new_status).await? == 0 {
        return Err(OrderError::NotFound(order_id.to_string()));
    }

    tracing::info!(order_id, payment_status = %new_status, "Payment status set by admin");

    order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
}
