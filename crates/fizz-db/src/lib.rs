//! # fizz-db: Catalog / Ledger Gateway for Fizz POS
//!
//! Record storage for products, transactions, transaction line items and
//! ingredient purchases, on SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fizz POS Data Flow                               │
//! │                                                                         │
//! │  Terminal command (complete_sale)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     fizz-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌─────────────┐  │   │
//! │  │   │   Database    │    │   Repositories   │   │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ Product          │   │ (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ Transaction      │   │ 001_init    │  │   │
//! │  │   │               │    │ Ingredient       │   │             │  │   │
//! │  │   └───────────────┘    └──────────────────┘   └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/fizz.db                                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fizz_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("fizz.db")).await?;
//! let catalog = db.products().list().await?;
//! let history = db.transactions().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::ingredient::IngredientRepository;
pub use repository::product::ProductRepository;
pub use repository::transaction::TransactionRepository;
