//! Request body extractor
//!
//! Like [`axum::Json`], but a missing, malformed or mistyped body is rejected
//! with the [`AppError`] envelope (400, `ValidationFailed`) instead of axum's
//! plain-text 415/422.

use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::utils::AppError;

/// JSON request body
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Rejected request body");
                Err(AppError::validation(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                )))
            }
        }
    }
}
