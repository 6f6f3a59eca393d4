//! Admin API Handlers

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{
    Account, AccountStatus, AccountStatusUpdate, Order, OrderStatus, OrderStatusHistory,
    OrderStatusUpdate, Page, PaymentStatusUpdate, Role,
};

use crate::api::extract::ValidJson;
use crate::api::query::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::{account, order as order_repo, product};
use crate::orders::{self, OrderError};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Default, Deserialize)]
pub struct ShopkeeperQuery {
    pub status: Option<String>,
}

/// Marketplace counters
#[derive(Debug, Serialize)]
pub struct Stats {
    pub customers: i64,
    pub shopkeepers: i64,
    pub pending_shopkeepers: i64,
    pub products: i64,
    pub orders: i64,
    /// Sum of non-cancelled order totals
    pub revenue: f64,
    /// Every status is present, zero when unused
    pub orders_by_status: BTreeMap<&'static str, i64>,
}

fn parse_account_status(value: &str) -> AppResult<AccountStatus> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid account status: {value}")))
}

fn account_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::AccountNotFound, format!("Shopkeeper {id} not found"))
}

// ── Orders ──────────────────────────────────────────────────────────

pub async fn list_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Order>>> {
    user.require_role(Role::Admin)?;
    let status = query.status()?;

    let (items, total) =
        order_repo::list_all(state.pool(), status, query.limit(), query.offset()).await?;

    Ok(Json(Page {
        items,
        total,
        page: query.page(),
        limit: query.limit(),
    }))
}

pub async fn set_order_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    ValidJson(payload): ValidJson<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    user.require_role(Role::Admin)?;
    let order = orders::set_order_status(
        state.pool(),
        &order_id,
        &payload.status,
        payload.note.as_deref(),
    )
    .await?;
    Ok(Json(order))
}

pub async fn set_payment_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    ValidJson(payload): ValidJson<PaymentStatusUpdate>,
) -> AppResult<Json<Order>> {
    user.require_role(Role::Admin)?;
    let order = orders::set_payment_status(state.pool(), &order_id, &payload.status).await?;
    Ok(Json(order))
}

pub async fn order_history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
) -> AppResult<Json<Vec<OrderStatusHistory>>> {
    user.require_role(Role::Admin)?;

    if order_repo::find_by_id(state.pool(), &order_id).await?.is_none() {
        return Err(OrderError::NotFound(order_id).into());
    }
    let history = order_repo::list_history(state.pool(), &order_id).await?;
    Ok(Json(history))
}

// ── Shopkeeper moderation ───────────────────────────────────────────

pub async fn list_shopkeepers(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ShopkeeperQuery>,
) -> AppResult<Json<Vec<Account>>> {
    user.require_role(Role::Admin)?;

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(parse_account_status(s)?),
    };
    let accounts = account::find_by_role(state.pool(), Role::Shopkeeper, status).await?;
    Ok(Json(accounts))
}

/// Approve (`active`), block, or return a shopkeeper to `pending`
pub async fn set_shopkeeper_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<AccountStatusUpdate>,
) -> AppResult<Json<Account>> {
    user.require_role(Role::Admin)?;
    let status = parse_account_status(&payload.status)?;

    let target = account::find_by_id(state.pool(), &id)
        .await?
        .ok_or_else(|| account_not_found(&id))?;
    match target.role {
        Role::Admin => {
            security_log!(
                "WARN",
                "admin_modification_denied",
                user_id = user.id.as_str(),
                target = id.as_str()
            );
            return Err(AppError::with_message(
                ErrorCode::CannotModifyAdmin,
                "Admin accounts cannot be moderated",
            ));
        }
        Role::Customer => return Err(account_not_found(&id)),
        Role::Shopkeeper => {}
    }

    let updated = account::update_status(state.pool(), &id, status).await?;
    security_log!(
        "INFO",
        "shopkeeper_status_changed",
        user_id = user.id.as_str(),
        target = id.as_str(),
        status = status.as_str()
    );
    Ok(Json(updated))
}

// ── Statistics ──────────────────────────────────────────────────────

pub async fn stats(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<Stats>> {
    user.require_role(Role::Admin)?;
    let pool = state.pool();

    let (customers, shopkeepers, pending_shopkeepers, products, orders, revenue, by_status) =
        tokio::try_join!(
            account::count_by_role(pool, Role::Customer),
            account::count_by_role(pool, Role::Shopkeeper),
            account::count_by_role_and_status(pool, Role::Shopkeeper, AccountStatus::Pending),
            product::count_all(pool),
            order_repo::count_all(pool),
            order_repo::revenue(pool),
            order_repo::count_by_status(pool),
        )?;

    let mut orders_by_status: BTreeMap<&'static str, i64> =
        OrderStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for (status, count) in by_status {
        orders_by_status.insert(status.as_str(), count);
    }

    Ok(Json(Stats {
        customers,
        shopkeepers,
        pending_shopkeepers,
        products,
        orders,
        revenue,
        orders_by_status,
    }))
}
