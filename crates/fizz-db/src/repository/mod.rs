//! # Repository Module
//!
//! Database repository implementations for Fizz POS.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Terminal command                                                       │
//! │       │  db.products().add_stock(id, 12)                                │
//! │       ▼                                                                 │
//! │  ProductRepository      catalog + authoritative stock counter           │
//! │  TransactionRepository  append-only ledger (header + line snapshots)    │
//! │  IngredientRepository   ingredient cost entries                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every repository holds a clone of the same `SqlitePool`.

pub mod ingredient;
pub mod product;
pub mod transaction;
