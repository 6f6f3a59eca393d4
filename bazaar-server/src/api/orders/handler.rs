//! Customer order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{CheckoutRequest, CheckoutResponse, OrderDetail, OrderSummary, Role};

use crate::api::extract::ValidJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::order as order_repo;
use crate::orders::{self, OrderError};
use crate::utils::AppResult;

/// Convert the caller's cart into an order
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    user.require_role(Role::Customer)?;

    let response = orders::checkout(
        state.pool(),
        &user.id,
        &payload.shipping_address,
        state.config.checkout_timeout(),
    )
    .await?;

    Ok(Json(response))
}

/// Order detail; orders of other customers read as not found
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    user.require_role(Role::Customer)?;

    let order = order_repo::find_for_customer(state.pool(), &order_id, &user.id)
        .await?
        .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;
    let items = order_repo::list_items(state.pool(), &order_id).await?;
    let history = order_repo::list_history(state.pool(), &order_id).await?;

    Ok(Json(OrderDetail {
        order,
        items,
        history,
    }))
}

pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OrderSummary>>> {
    user.require_role(Role::Customer)?;
    let orders = order_repo::list_for_customer(state.pool(), &user.id).await?;
    Ok(Json(orders))
}
