use crate::db::RepoError;
use crate::utils::{AppError, ErrorCode};
use thiserror::Error;

/// Checkout and status workflow errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Only {available} units available for {product_name}")]
    InsufficientStock {
        product_id: String,
        product_name: String,
        requested: i64,
        available: i64,
    },

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    #[error("Invalid payment status: {0}")]
    InvalidPaymentStatus(String),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Checkout timed out")]
    Timeout,

    #[error("Validation error: {0}")]
    Validation(String),

    /// Server-side fault the client cannot fix by changing the request
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Repo(RepoError::from(err))
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => AppError::new(ErrorCode::CartEmpty),
            OrderError::InsufficientStock {
                product_id,
                product_name,
                requested,
                available,
            } => AppError::with_message(
                ErrorCode::InsufficientStock,
                format!("Only {available} units available for {product_name}"),
            )
            .with_detail("product_id", product_id)
            .with_detail("requested", requested)
            .with_detail("available", available),
            OrderError::InvalidStatus(status) => AppError::with_message(
                ErrorCode::InvalidOrderStatus,
                format!("Invalid order status: {status}"),
            ),
            OrderError::InvalidPaymentStatus(status) => AppError::with_message(
                ErrorCode::InvalidPaymentStatus,
                format!("Invalid payment status: {status}"),
            ),
            OrderError::NotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
                    .with_detail("order_id", id)
            }
            OrderError::Timeout => AppError::timeout("Checkout timed out, please retry"),
            OrderError::Validation(msg) => AppError::validation(msg),
            OrderError::Internal(msg) => AppError::internal(msg),
            OrderError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_insufficient_stock_message_and_details() {
        let err: AppError = OrderError::InsufficientStock {
            product_id: "P1002".into(),
            product_name: "Lamp".into(),
            requested: 1,
            available: 0,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Only 0 units available for Lamp");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        let details = err.details.unwrap();
        assert_eq!(details["product_id"], "P1002");
        assert_eq!(details["available"], 0);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(OrderError::EmptyCart).http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(OrderError::NotFound("ORD1".into())).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(OrderError::Timeout).http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(OrderError::InvalidStatus("done".into())).http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_is_server_error() {
        let err = AppError::from(OrderError::Internal("order id ORD10001 already taken".into()));
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
