//! Order fulfillment
//!
//! - [`checkout`] converts a cart into an order in one transaction
//! - [`workflow`] moves orders and sub-orders through their statuses
//! - [`money`] decimal price arithmetic

pub mod checkout;
pub mod error;
pub mod money;
pub mod workflow;

pub use checkout::checkout;
pub use error::OrderError;
pub use workflow::{advance_shopkeeper_order, set_order_status, set_payment_status};
