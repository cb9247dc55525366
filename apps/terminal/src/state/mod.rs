//! # Terminal State
//!
//! Three focused state objects instead of one big store. Each command takes
//! only the ones it needs.
//!
//! ```text
//! ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐
//! │    DbState       │ │    CartState     │ │    ConfigState       │
//! │  • Database pool │ │  • Current cart  │ │  • Store header      │
//! │  • Repositories  │ │  • Arc<Mutex<_>> │ │  • Tax rate          │
//! │                  │ │                  │ │  • Stock retry policy│
//! └──────────────────┘ └──────────────────┘ └──────────────────────┘
//! ```
//!
//! The cart is only changed from confirmed results: checkout clears it after
//! the ledger write succeeds, never before.

mod cart;
mod config;
mod db;

pub use cart::CartState;
pub use config::ConfigState;
pub use db::DbState;
