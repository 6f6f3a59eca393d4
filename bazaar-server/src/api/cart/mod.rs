//! Cart API (customers)
//!
//! | Path | Method | Body |
//! |------|--------|------|
//! | /api/cart | GET | |
//! | /api/cart | POST | `{product_id, quantity}` |
//! | /api/cart/sync | POST | `{items: [{product_id, quantity}]}` |
//! | /api/cart/{product_id} | PUT | `{quantity}` (0 removes) |
//! | /api/cart/{product_id} | DELETE | |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view).post(handler::add))
        .route("/sync", post(handler::sync))
        .route("/{product_id}", put(handler::update).delete(handler::remove))
}
