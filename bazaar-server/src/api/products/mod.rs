//! Catalog API (public)
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/products | GET | none |
//! | /api/products/{id} | GET | none |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
}
