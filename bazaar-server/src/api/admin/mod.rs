//! Admin API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/admin/orders | GET | All orders, `?page&limit&status` |
//! | /api/admin/orders/{order_id}/status | PUT | Force order status (cascades) |
//! | /api/admin/orders/{order_id}/payment | PUT | Set payment status |
//! | /api/admin/orders/{order_id}/history | GET | Status audit trail |
//! | /api/admin/shopkeepers | GET | Shopkeeper accounts, `?status` |
//! | /api/admin/shopkeepers/{id}/status | PUT | Approve or block a shopkeeper |
//! | /api/admin/stats | GET | Marketplace counters |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list_orders))
        .route("/orders/{order_id}/status", put(handler::set_order_status))
        .route("/orders/{order_id}/payment", put(handler::set_payment_status))
        .route("/orders/{order_id}/history", get(handler::order_history))
        .route("/shopkeepers", get(handler::list_shopkeepers))
        .route("/shopkeepers/{id}/status", put(handler::set_shopkeeper_status))
        .route("/stats", get(handler::stats))
}
