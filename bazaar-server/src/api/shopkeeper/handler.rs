//! Shopkeeper API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use shared::models::{
    OrderStatusUpdate, Page, Product, ProductCreate, ProductUpdate, Role, ShopkeeperOrderView,
};

use crate::api::extract::ValidJson;
use crate::api::query::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::{RepoError, order as order_repo, product};
use crate::orders;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Result of a sub-order status change
#[derive(Debug, Serialize)]
pub struct StatusUpdated {
    pub order_id: String,
    pub status: String,
    /// Sub-order rows moved
    pub updated: u64,
}

fn product_error(id: &str, err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(_) => {
            AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
                .with_detail("product_id", id)
        }
        RepoError::Referenced(_) => AppError::with_message(
            ErrorCode::ProductInUse,
            format!("Product {id} appears in orders and cannot be deleted"),
        )
        .with_detail("product_id", id),
        other => other.into(),
    }
}

fn validate_create(payload: &ProductCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.size, "size", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

fn validate_update(payload: &ProductUpdate) -> AppResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(category) = &payload.category {
        validate_required_text(category, "category", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.size, "size", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

// ── Products ────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    user.require_role(Role::Shopkeeper)?;
    let products = product::find_by_shopkeeper(state.pool(), &user.id).await?;
    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<ProductCreate>,
) -> AppResult<Json<Product>> {
    user.require_role(Role::Shopkeeper)?;
    validate_create(&payload)?;

    let created = product::create(state.pool(), &user.id, payload).await?;
    tracing::info!(product_id = %created.id, shopkeeper_id = %user.id, "Product created");
    Ok(Json(created))
}

pub async fn update_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<ProductUpdate>,
) -> AppResult<Json<Product>> {
    user.require_role(Role::Shopkeeper)?;
    validate_update(&payload)?;

    let updated = product::update(state.pool(), &id, &user.id, payload)
        .await
        .map_err(|e| product_error(&id, e))?;
    Ok(Json(updated))
}

pub async fn delete_product(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    user.require_role(Role::Shopkeeper)?;

    product::delete(state.pool(), &id, &user.id)
        .await
        .map_err(|e| product_error(&id, e))?;
    tracing::info!(product_id = %id, shopkeeper_id = %user.id, "Product deleted");
    Ok(Json(true))
}

// ── Orders ──────────────────────────────────────────────────────────

pub async fn list_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<ShopkeeperOrderView>>> {
    user.require_role(Role::Shopkeeper)?;
    let status = query.status()?;

    let (items, total) = order_repo::list_shopkeeper_orders(
        state.pool(),
        &user.id,
        status,
        query.limit(),
        query.offset(),
    )
    .await?;

    Ok(Json(Page {
        items,
        total,
        page: query.page(),
        limit: query.limit(),
    }))
}

/// Move the caller's rows of an order to `processing`, `shipped` or `cancelled`
pub async fn update_order_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(order_id): Path<String>,
    ValidJson(payload): ValidJson<OrderStatusUpdate>,
) -> AppResult<Json<StatusUpdated>> {
    user.require_role(Role::Shopkeeper)?;

    let updated = orders::advance_shopkeeper_order(
        state.pool(),
        &user.id,
        &order_id,
        &payload.status,
        payload.note.as_deref(),
    )
    .await?;

    Ok(Json(StatusUpdated {
        order_id,
        status: payload.status.trim().to_string(),
        updated,
    }))
}
