//! Cart API Handlers
//!
//! Every mutation answers with the refreshed cart.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{CartAdd, CartItem, CartLineDetail, CartSync, CartUpdate, CartView, Role};

use crate::api::extract::ValidJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::RepoError;
use crate::db::cart::{self, AddOutcome, UpdateOutcome};
use crate::orders::money;
use crate::utils::validation::{MAX_QUANTITY, validate_quantity};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Most lines accepted in one sync payload
const MAX_SYNC_LINES: usize = 200;

fn product_not_found(product_id: &str) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {product_id} not found"))
        .with_detail("product_id", product_id)
}

fn out_of_stock(product_id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::ProductOutOfStock,
        format!("Product {product_id} is out of stock"),
    )
    .with_detail("product_id", product_id)
}

fn not_in_cart(product_id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::CartItemNotFound,
        format!("Product {product_id} is not in the cart"),
    )
}

/// Price lines at the current catalog price
fn to_view(lines: Vec<CartLineDetail>) -> CartView {
    let mut subtotals = Vec::with_capacity(lines.len());
    let items = lines
        .into_iter()
        .map(|line| {
            let unit_price = money::unit_price(line.price, line.discount);
            let subtotal = money::line_subtotal(unit_price, line.quantity);
            subtotals.push(subtotal);
            CartItem {
                product_id: line.product_id,
                product_name: line.product_name,
                quantity: line.quantity,
                price: line.price,
                discount: line.discount,
                final_price: money::to_f64(unit_price),
                subtotal: money::to_f64(subtotal),
                stock: line.stock,
                image: line.image,
            }
        })
        .collect();

    CartView {
        items,
        total: money::to_f64(money::sum(subtotals)),
    }
}

async fn current_cart(state: &ServerState, customer_id: &str) -> AppResult<Json<CartView>> {
    let lines = cart::list_cart_lines(state.pool(), customer_id).await?;
    Ok(Json(to_view(lines)))
}

pub async fn view(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CartView>> {
    user.require_role(Role::Customer)?;
    current_cart(&state, &user.id).await
}

pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<CartAdd>,
) -> AppResult<Json<CartView>> {
    user.require_role(Role::Customer)?;
    validate_quantity(payload.quantity)?;

    match cart::add(state.pool(), &user.id, &payload).await? {
        AddOutcome::Added(quantity) => {
            tracing::debug!(
                customer_id = %user.id,
                product_id = %payload.product_id,
                quantity,
                "Cart line added"
            );
        }
        AddOutcome::ProductNotFound => return Err(product_not_found(&payload.product_id)),
        AddOutcome::OutOfStock => return Err(out_of_stock(&payload.product_id)),
    }

    current_cart(&state, &user.id).await
}

pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
    ValidJson(payload): ValidJson<CartUpdate>,
) -> AppResult<Json<CartView>> {
    user.require_role(Role::Customer)?;
    if payload.quantity != 0 {
        validate_quantity(payload.quantity)?;
    }

    match cart::set_quantity(state.pool(), &user.id, &product_id, payload.quantity).await? {
        UpdateOutcome::Updated(_) | UpdateOutcome::Removed => {}
        UpdateOutcome::LineNotFound => return Err(not_in_cart(&product_id)),
        UpdateOutcome::OutOfStock => return Err(out_of_stock(&product_id)),
    }

    current_cart(&state, &user.id).await
}

pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> AppResult<Json<CartView>> {
    user.require_role(Role::Customer)?;

    match cart::remove(state.pool(), &user.id, &product_id).await {
        Ok(()) => {}
        Err(RepoError::NotFound(_)) => return Err(not_in_cart(&product_id)),
        Err(e) => return Err(e.into()),
    }

    current_cart(&state, &user.id).await
}

/// Replace the cart with the client's lines
pub async fn sync(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<CartSync>,
) -> AppResult<Json<CartView>> {
    user.require_role(Role::Customer)?;
    if payload.items.len() > MAX_SYNC_LINES {
        return Err(AppError::validation(format!(
            "too many cart lines ({}, max {MAX_SYNC_LINES})",
            payload.items.len()
        )));
    }

    let items: Vec<CartAdd> = payload
        .items
        .into_iter()
        .map(|mut item| {
            item.quantity = item.quantity.min(MAX_QUANTITY);
            item
        })
        .collect();

    let kept = cart::sync(state.pool(), &user.id, &items).await?;
    tracing::debug!(customer_id = %user.id, submitted = items.len(), kept, "Cart synced");

    current_cart(&state, &user.id).await
}
