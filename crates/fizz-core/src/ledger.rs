//! # Transaction Ledger
//!
//! The append-only history of completed sales. It is the source of truth
//! for both the sales dashboard and the ledger-derived stock figures.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append(tx3)                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  [tx1, tx2, tx3]   stored oldest → newest                               │
//! │       │                                                                 │
//! │       ├── newest_first() → tx3, tx2, tx1   (history screen)             │
//! │       └── oldest_first() → tx1, tx2, tx3   (daily income series)        │
//! │                                                                         │
//! │  There is no update and no delete. A mistake is corrected by a later    │
//! │  compensating entry, never by editing an old one.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::inventory::quantities_by_product;
use crate::money::Money;
use crate::pricing::{self, Quote};
use crate::types::{PaymentMethod, Transaction, TransactionLine};

// =============================================================================
// Building Transactions
// =============================================================================

/// Builds the immutable record of a cash sale.
///
/// Fails with [`CoreError::EmptyCart`] when there are no lines and with
/// [`CoreError::InsufficientCash`] when the cash does not cover the total.
/// The quote is trusted as computed from `lines`.
pub fn prepare_cash_transaction(
    lines: Vec<TransactionLine>,
    quote: Quote,
    cash_received: Money,
    created_at: DateTime<Utc>,
) -> CoreResult<Transaction> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let change = pricing::settle(quote.total, cash_received)?;

    Ok(Transaction {
        id: Uuid::new_v4().to_string(),
        receipt_number: generate_receipt_number(created_at),
        lines,
        subtotal_cents: quote.subtotal.cents(),
        tax_cents: quote.tax.cents(),
        tax_rate_bps: quote.tax_rate.bps(),
        total_cents: quote.total.cents(),
        payment_method: PaymentMethod::Cash,
        cash_received_cents: cash_received.cents(),
        change_cents: change.cents(),
        created_at,
    })
}

/// Generates a human-readable receipt number.
///
/// Format: `R<epoch millis><3 random digits>`, e.g. `R1718000000000042`.
/// The random suffix separates two sales rung up in the same millisecond;
/// the database UNIQUE constraint catches anything that still collides.
pub fn generate_receipt_number(at: DateTime<Utc>) -> String {
    let bytes = Uuid::new_v4().into_bytes();
    let suffix = u16::from_le_bytes([bytes[0], bytes[1]]) % 1000;
    format!("R{}{:03}", at.timestamp_millis(), suffix)
}

// =============================================================================
// Ledger
// =============================================================================

/// In-memory view of the transaction history.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Oldest first.
    entries: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from records in any order.
    pub fn from_history(mut history: Vec<Transaction>) -> Self {
        history.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Self { entries: history }
    }

    /// Appends a completed transaction.
    ///
    /// A record older than the current newest entry (clock skew between
    /// terminals) is slotted in by timestamp so iteration stays ordered.
    pub fn append(&mut self, transaction: Transaction) {
        let at = self
            .entries
            .partition_point(|t| t.created_at <= transaction.created_at);
        self.entries.insert(at, transaction);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display order: most recent sale first.
    pub fn newest_first(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter().rev()
    }

    /// Aggregation order: earliest sale first.
    pub fn oldest_first(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    /// The `limit` most recent transactions.
    pub fn recent(&self, limit: usize) -> Vec<&Transaction> {
        self.newest_first().take(limit).collect()
    }

    pub fn find_by_receipt(&self, receipt_number: &str) -> Option<&Transaction> {
        self.entries
            .iter()
            .find(|t| t.receipt_number == receipt_number)
    }

    /// Units sold per product across the whole history.
    pub fn sold_by_product(&self) -> HashMap<String, i64> {
        quantities_by_product(self.entries.iter().flat_map(|t| t.lines.iter()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
