//! Shopkeeper API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/shopkeeper/products | GET | Own products |
//! | /api/shopkeeper/products | POST | List a new product |
//! | /api/shopkeeper/products/{id} | PUT | Partial update of an own product |
//! | /api/shopkeeper/products/{id} | DELETE | Remove an own product |
//! | /api/shopkeeper/orders | GET | Own sub-orders, `?page&limit&status` |
//! | /api/shopkeeper/orders/{order_id}/status | PUT | Advance own rows of an order |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shopkeeper", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/products", get(handler::list_products).post(handler::create_product))
        .route(
            "/products/{id}",
            put(handler::update_product).delete(handler::delete_product),
        )
        .route("/orders", get(handler::list_orders))
        .route("/orders/{order_id}/status", put(handler::update_order_status))
}
