//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI action (e.g. "Complete Payment")                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → Result<T, ApiError>                          │  │
//! │  │                                                                  │  │
//! │  │  ValidationError ─┐                                              │  │
//! │  │  CoreError ───────┼──► ApiError { code, message } ─────────────► │  │
//! │  │  DbError ─────────┘                                              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  One-shot notice: "Insufficient cash: total ₱95.00, received ₱90.00"    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database failures are logged in full and surfaced with a generic
//! message under `DATABASE_ERROR`.

use fizz_core::{CoreError, ValidationError};
use fizz_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from commands.
///
/// ```json
/// { "code": "OUT_OF_STOCK", "message": "Fruity Soda is out of stock" }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Business rule rejected the action
    BusinessLogic,

    /// Internal error
    Internal,

    /// Cart operation failed
    CartError,

    /// Product has no stock
    OutOfStock,

    /// Cash payment rejected
    PaymentError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                let field = field.rsplit('.').next().unwrap_or(&field).to_string();
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::Validation(e) => ApiError::from(e),
            DbError::ConstraintViolation { message } => {
                tracing::error!("Constraint violation: {}", message);
                ApiError::new(ErrorCode::DatabaseError, "Database rejected the change")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored record could not be decoded: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::LineNotFound(_) => ApiError::cart(message),
            CoreError::OutOfStock { .. } => ApiError::new(ErrorCode::OutOfStock, message),
            CoreError::MissingVariant { .. }
            | CoreError::UnknownVariant { .. }
            | CoreError::QuantityTooLarge { .. } => ApiError::validation(message),
            CoreError::NotPurchasable { .. } => ApiError::new(ErrorCode::BusinessLogic, message),
            CoreError::CartTooLarge { .. } | CoreError::EmptyCart => ApiError::cart(message),
            CoreError::InsufficientCash { .. } => ApiError::new(ErrorCode::PaymentError, message),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fizz_core::Money;

    #[test]
    fn test_core_error_codes() {
        let err = ApiError::from(CoreError::InsufficientCash {
            total: Money::from_cents(9500),
            received: Money::from_cents(9000),
        });
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert!(err.message.contains("₱95.00"));

        let err = ApiError::from(CoreError::OutOfStock {
            name: "Fruity Soda".to_string(),
        });
        assert_eq!(err.code, ErrorCode::OutOfStock);

        assert_eq!(ApiError::from(CoreError::EmptyCart).code, ErrorCode::CartError);
    }

    #[test]
    fn test_db_error_codes() {
        let err = ApiError::from(DbError::not_found("Product", "abc"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: abc");

        let err = ApiError::from(DbError::duplicate("products.sku", "FS001"));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "sku 'FS001' already exists");

        let err = ApiError::from(DbError::QueryFailed("disk I/O error".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("disk"));
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::from(CoreError::EmptyCart)).unwrap();
        assert_eq!(json["code"], "CART_ERROR");
        assert!(json["message"].is_string());
    }
}
