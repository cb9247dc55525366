//! # Terminal Commands
//!
//! Everything a UI layer invokes.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── product.rs    ◄─── Catalog CRUD, stock top-ups, ingredient costs
//! ├── cart.rs       ◄─── Cart manipulation
//! ├── sale.rs       ◄─── Cash checkout, ledger reads, receipts
//! ├── dashboard.rs  ◄─── Sales summary, low stock, income trend
//! └── config.rs     ◄─── Configuration retrieval
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! list_products(&terminal.db).await?;
//!
//! // Only needs cart
//! get_cart(&terminal.cart, &terminal.config);
//!
//! // Needs all three
//! complete_sale(&terminal.db, &terminal.cart, &terminal.config, "100".into()).await?;
//! ```
//!
//! Every fallible command returns `Result<T, ApiError>`; see
//! [`crate::error`] for how failures are classified.

pub mod cart;
pub mod config;
pub mod dashboard;
pub mod product;
pub mod sale;
