//! bazaar-server: marketplace backend
//!
//! Customers browse products, keep a server-side cart and check out;
//! shopkeepers list products and fulfill their share of each order; admins
//! moderate shopkeepers and force order/payment status.
//!
//! # Modules
//!
//! - [`core`] - configuration, shared state, HTTP server
//! - [`db`] - SQLite pool, migrations, id sequences, repositories
//! - [`orders`] - checkout engine and status workflow
//! - [`auth`] - JWT issuing/validation, password hashing, `CurrentUser`
//! - [`api`] - HTTP handlers and router
//! - [`utils`] - error re-exports, logging, input validation

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

/// Security event logging (target `security`)
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
