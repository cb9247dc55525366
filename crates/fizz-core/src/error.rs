//! # Error Types
//!
//! Domain-specific error types for fizz-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fizz-core errors (this file)                                          │
//! │  ├── CoreError        - Cart, checkout and domain rule failures        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fizz-db errors (separate crate)                                       │
//! │  └── DbError          - Gateway failures                               │
//! │                                                                         │
//! │  fizz-terminal errors                                                  │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is raised *before* any I/O happens, so a caller that
//! receives one can assume nothing was written.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the catalog snapshot the caller supplied.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No cart line carries the given identity key.
    #[error("Cart line not found: {0}")]
    LineNotFound(String),

    /// Product has no stock left and cannot be added to the cart.
    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    /// Customizable product added without choosing a flavor or a size.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "Fruity Soda"
    ///      │
    ///      ▼
    /// Flavor picked, size not picked
    ///      │
    ///      ▼
    /// MissingVariant { product: "Fruity Soda", variant: "size" }
    ///      │
    ///      ▼
    /// UI shows: "Please select a size for Fruity Soda"
    /// ```
    #[error("Please select a {variant} for {product}")]
    MissingVariant { product: String, variant: String },

    /// Flavor or size label that the product does not offer.
    #[error("{product} has no {variant} named '{label}'")]
    UnknownVariant {
        product: String,
        variant: String,
        label: String,
    },

    /// Customizable product whose flavor or size list is empty.
    #[error("{product} is not purchasable: no {variant} options configured")]
    NotPurchasable { product: String, variant: String },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cash tendered does not cover the total.
    #[error("Insufficient cash: total {total}, received {received}")]
    InsufficientCash { total: Money, received: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (bad cash input, bad SKU characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value inside one record (repeated flavor label).
    #[error("{field} '{value}' is listed more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
