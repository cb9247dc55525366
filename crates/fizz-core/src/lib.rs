//! # fizz-core: Pure Business Logic for Fizz POS
//!
//! Everything that decides *what* happens at the counter lives here: prices,
//! cart lines, stock decrements, ledger ordering and dashboard figures.
//! Nothing in this crate touches a database, a socket or a clock it was not
//! handed.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Fizz POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI layer (out of tree)                       │   │
//! │  │    Catalog ──► Cart ──► Cash Tender ──► Receipt ──► Dashboard   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              fizz-terminal (state + commands)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fizz-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌────────┐ ┌───────────┐ ┌────────┐ ┌─────────┐  │   │
//! │  │   │ pricing │ │  cart  │ │ inventory │ │ ledger │ │  sales  │  │   │
//! │  │   └─────────┘ └────────┘ └───────────┘ └────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                fizz-db (Catalog / Ledger gateway)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, SizeVariant, Transaction, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Subtotal, tax, total and change
//! - [`cart`] - In-memory cart keyed by (product, flavor, size)
//! - [`inventory`] - Stock decrement planning and reconciliation reports
//! - [`ledger`] - Append-only transaction history
//! - [`sales`] - Dashboard aggregation (summary, low stock, daily income)
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use fizz_core::money::Money;
//! use fizz_core::pricing;
//! use fizz_core::types::TaxRate;
//!
//! let subtotal = Money::from_cents(9500); // ₱95.00
//! let quote = pricing::quote(subtotal, TaxRate::zero());
//! assert_eq!(quote.total, subtotal);
//! assert_eq!(pricing::change(quote.total, Money::from_cents(10000)).cents(), 500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod sales;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest accepted price or cost, in centavos (₱1,000,000.00).
///
/// Keeps `price × MAX_ITEM_QUANTITY × MAX_CART_ITEMS` far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Stock at or below this level is reported as "low" on the dashboard.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// How many products the dashboard ranks by revenue.
pub const TOP_PRODUCTS_LIMIT: usize = 5;
