//! # Transaction Repository
//!
//! Persistence for the append-only sales ledger.
//!
//! ## Append
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     append(&Transaction)                                │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── INSERT transactions        (header: totals, cash, change)        │
//! │   ├── INSERT transaction_items   line 0                                 │
//! │   ├── INSERT transaction_items   line 1                                 │
//! │   └── ...                                                               │
//! │  COMMIT  ← all rows visible together, or none at all                    │
//! │                                                                         │
//! │  UPDATE / DELETE on either table is refused by triggers.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fizz_core::{PaymentMethod, SizeVariant, Transaction, TransactionLine};

const HEADER_COLUMNS: &str = "id, receipt_number, subtotal_cents, tax_cents, tax_rate_bps, \
     total_cents, payment_method, cash_received_cents, change_cents, created_at";

const ITEM_COLUMNS: &str = "transaction_id, product_id, sku_snapshot, name_snapshot, \
     flavor, size_label, size_price_cents, size_description, \
     unit_price_cents, quantity, line_total_cents";

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    receipt_number: String,
    subtotal_cents: i64,
    tax_cents: i64,
    tax_rate_bps: u32,
    total_cents: i64,
    payment_method: PaymentMethod,
    cash_received_cents: i64,
    change_cents: i64,
    created_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self, lines: Vec<TransactionLine>) -> Transaction {
        Transaction {
            id: self.id,
            receipt_number: self.receipt_number,
            lines,
            subtotal_cents: self.subtotal_cents,
            tax_cents: self.tax_cents,
            tax_rate_bps: self.tax_rate_bps,
            total_cents: self.total_cents,
            payment_method: self.payment_method,
            cash_received_cents: self.cash_received_cents,
            change_cents: self.change_cents,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    transaction_id: String,
    product_id: String,
    sku_snapshot: String,
    name_snapshot: String,
    flavor: Option<String>,
    size_label: Option<String>,
    size_price_cents: Option<i64>,
    size_description: Option<String>,
    unit_price_cents: i64,
    quantity: i64,
    line_total_cents: i64,
}

impl From<ItemRow> for TransactionLine {
    fn from(row: ItemRow) -> Self {
        let size = row.size_label.map(|label| SizeVariant {
            label,
            price_cents: row.size_price_cents.unwrap_or(row.unit_price_cents),
            description: row.size_description.unwrap_or_default(),
        });

        TransactionLine {
            product_id: row.product_id,
            sku_snapshot: row.sku_snapshot,
            name_snapshot: row.name_snapshot,
            flavor: row.flavor,
            size,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
            line_total_cents: row.line_total_cents,
        }
    }
}

/// Attaches item rows (ordered by line_no) to their headers.
fn assemble(headers: Vec<TransactionRow>, items: Vec<ItemRow>) -> Vec<Transaction> {
    let mut lines_by_tx: HashMap<String, Vec<TransactionLine>> = HashMap::new();
    for item in items {
        lines_by_tx
            .entry(item.transaction_id.clone())
            .or_default()
            .push(TransactionLine::from(item));
    }

    headers
        .into_iter()
        .map(|header| {
            let lines = lines_by_tx.remove(&header.id).unwrap_or_default();
            header.into_transaction(lines)
        })
        .collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the transaction ledger. Append and read only.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Records a completed sale: the header row and every line item in a
    /// single database transaction.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - The stored record
    /// * `Err(DbError::UniqueViolation)` - Receipt number or ID already used
    /// * `Err(_)` - Nothing was written
    pub async fn append(&self, transaction: &Transaction) -> DbResult<Transaction> {
        debug!(
            id = %transaction.id,
            receipt_number = %transaction.receipt_number,
            lines = transaction.lines.len(),
            "Appending transaction"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, receipt_number, subtotal_cents, tax_cents, tax_rate_bps,
                total_cents, payment_method, cash_received_cents, change_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.receipt_number)
        .bind(transaction.subtotal_cents)
        .bind(transaction.tax_cents)
        .bind(transaction.tax_rate_bps)
        .bind(transaction.total_cents)
        .bind(transaction.payment_method)
        .bind(transaction.cash_received_cents)
        .bind(transaction.change_cents)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                DbError::duplicate(field, &transaction.receipt_number)
            }
            other => other,
        })?;

        for (line_no, line) in transaction.lines.iter().enumerate() {
            let size = line.size.as_ref();
            sqlx::query(
                r#"
                INSERT INTO transaction_items (
                    id, transaction_id, line_no, product_id, sku_snapshot, name_snapshot,
                    flavor, size_label, size_price_cents, size_description,
                    unit_price_cents, quantity, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&transaction.id)
            .bind(line_no as i64)
            .bind(&line.product_id)
            .bind(&line.sku_snapshot)
            .bind(&line.name_snapshot)
            .bind(&line.flavor)
            .bind(size.map(|s| s.label.clone()))
            .bind(size.map(|s| s.price_cents))
            .bind(size.map(|s| s.description.clone()))
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            id = %transaction.id,
            receipt_number = %transaction.receipt_number,
            total_cents = transaction.total_cents,
            "Transaction recorded"
        );

        Ok(transaction.clone())
    }

    /// The full ledger, newest first.
    pub async fn list(&self) -> DbResult<Vec<Transaction>> {
        let headers: Vec<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {HEADER_COLUMNS} FROM transactions \
             ORDER BY created_at DESC, receipt_number DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let items: Vec<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM transaction_items ORDER BY transaction_id, line_no"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = headers.len(), "Loaded ledger");
        Ok(assemble(headers, items))
    }

    /// The `limit` most recent transactions, newest first.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<Transaction>> {
        let headers: Vec<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {HEADER_COLUMNS} FROM transactions \
             ORDER BY created_at DESC, receipt_number DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let items: Vec<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM transaction_items \
             WHERE transaction_id IN ( \
                SELECT id FROM transactions \
                ORDER BY created_at DESC, receipt_number DESC LIMIT ?1) \
             ORDER BY transaction_id, line_no"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble(headers, items))
    }

    /// Gets a transaction with its lines by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let header: Option<TransactionRow> = sqlx::query_as(&format!(
            "SELECT {HEADER_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let items: Vec<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM transaction_items \
             WHERE transaction_id = ?1 ORDER BY line_no"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let lines = items.into_iter().map(TransactionLine::from).collect();
        Ok(Some(header.into_transaction(lines)))
    }

    /// Looks a transaction up by its receipt number.
    pub async fn get_by_receipt(&self, receipt_number: &str) -> DbResult<Option<Transaction>> {
        let id: Option<String> =
            sqlx::query_scalar("SELECT id FROM transactions WHERE receipt_number = ?1")
                .bind(receipt_number)
                .fetch_optional(&self.pool)
                .await?;

        match id {
            Some(id) => self.get_by_id(&id).await,
            None => Ok(None),
        }
    }

    /// Units of a product sold across the whole ledger.
    pub async fn total_sold(&self, product_id: &str) -> DbResult<i64> {
        let sold: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM transaction_items WHERE product_id = ?1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sold)
    }

    /// Number of recorded transactions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
