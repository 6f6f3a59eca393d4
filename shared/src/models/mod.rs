//! Data models
//!
//! Shared between bazaar-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Ids are prefixed strings (`C11111`, `P1111`, `ORD10001`, ...) and
//! timestamps are Unix milliseconds.

pub mod account;
pub mod cart;
pub mod order;
pub mod product;

// Re-exports
pub use account::*;
pub use cart::*;
pub use order::*;
pub use product::*;

use thiserror::Error;

/// A status/role string did not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
