//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{Product, ProductQuery};

use crate::core::ServerState;
use crate::db::product;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Catalog listing with optional `category`, `shopkeeper_id` and `in_stock` filters
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(state.pool(), &query).await?;
    Ok(Json(products))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let found = product::find_by_id(state.pool(), &id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        })?;
    Ok(Json(found))
}
