//! Error handling
//!
//! Handlers return [`AppResult`]; repository and engine errors convert into
//! [`AppError`] with `?`. Infrastructure failures are logged here and reach
//! the caller only as a generic internal error.

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};

use crate::db::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => AppError::not_found(what),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Referenced(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(target: "database", error = %msg, "Database error occurred");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}
