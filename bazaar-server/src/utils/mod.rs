//! Utilities
//!
//! - [`AppError`] - application error type (from shared::error)
//! - [`ErrorBody`] - error envelope (from shared::error)
//! - logging setup and input validation helpers

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
