//! Unified error system for the bazaar marketplace
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: JSON envelope written for failed requests
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::InsufficientStock, "Only 2 units available for Mug")
//!     .with_detail("product_id", "P1001")
//!     .with_detail("available", 2);
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, 4003);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
