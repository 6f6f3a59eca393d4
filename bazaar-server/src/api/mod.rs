//! HTTP API
//!
//! - [`health`] - liveness probe
//! - [`auth`] - register, login, current account
//! - [`products`] - public catalog
//! - [`cart`] - customer cart
//! - [`orders`] - checkout and customer order history
//! - [`shopkeeper`] - own products and sub-orders
//! - [`admin`] - order control, shopkeeper moderation, statistics
//! - [`extract`] - JSON body extractor with enveloped rejections
//!
//! Success bodies are plain JSON; failures are the [`AppError`] envelope
//! `{code, message, details}`.
//!
//! [`AppError`]: crate::utils::AppError

pub mod admin;
pub mod auth;
pub mod cart;
pub mod extract;
pub mod health;
pub mod orders;
pub mod products;
pub mod query;
pub mod shopkeeper;

use axum::Router;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator (UUID v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware, no state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(shopkeeper::router())
        .merge(admin::router())
}

/// Fully configured application: routes, middleware and state
pub fn build_app(state: ServerState) -> Router {
    let request_timeout = state.config.request_timeout();

    build_router()
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state)
}
