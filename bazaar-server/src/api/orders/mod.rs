//! Customer order API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/order/checkout | POST | Place an order from the cart |
//! | /api/order/{order_id} | GET | One of the caller's orders with items and history |
//! | /api/orders/history | GET | The caller's orders, newest first |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/order/checkout", post(handler::checkout))
        .route("/api/order/{order_id}", get(handler::get_by_id))
        .route("/api/orders/history", get(handler::history))
}
