//! # Sale Commands
//!
//! Cash checkout and ledger reads.
//!
//! ## Checkout Saga
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  complete_sale(cash_received)                                           │
//! │       │                                                                 │
//! │  1. parse cash, snapshot cart, quote, check cash >= total               │
//! │       │   (any failure: nothing written, cart untouched)                │
//! │       ▼                                                                 │
//! │  2. ledger append: header + lines, one SQLite transaction               │
//! │       │   (failure: nothing written, cart untouched)                    │
//! │       ▼                                                                 │
//! │  3. clear cart                       ── the sale is final from here ──  │
//! │       ▼                                                                 │
//! │  4. reload sold products, plan decrements (floored at 0)                │
//! │       ▼                                                                 │
//! │  5. write each new stock level, retrying transient failures             │
//! │       ▼                                                                 │
//! │  CheckoutOutcome { transaction, receipt, reconciliation }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A stock write that still fails after its retries does not undo the sale.
//! It comes back in `reconciliation.failed` for the operator to fix by hand.

use std::collections::HashSet;

use chrono::Utc;
use fizz_core::inventory::{plan_decrements, ReconciliationReport};
use fizz_core::ledger::prepare_cash_transaction;
use fizz_core::validation::parse_cash_amount;
use fizz_core::{Product, Transaction, TransactionLine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::reconcile::{apply_plan, StockWriter};
use crate::receipt::{ReceiptView, RECEIPT_WIDTH};
use crate::state::{CartState, ConfigState, DbState};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub transaction: Transaction,
    pub receipt: ReceiptView,
    pub reconciliation: ReconciliationReport,
}

impl CheckoutOutcome {
    /// True when the sale went through but some stock levels are stale.
    pub fn needs_attention(&self) -> bool {
        !self.reconciliation.is_complete()
    }
}

/// Completes a cash sale for the current cart.
///
/// `cash_received` is the text typed at the tender screen, e.g. `"100"` or
/// `"95.50"`.
pub async fn complete_sale(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    cash_received: String,
) -> Result<CheckoutOutcome, ApiError> {
    let products = db.inner().products();
    checkout_with(db, &products, cart, config, &cash_received).await
}

pub(crate) async fn checkout_with<W>(
    db: &DbState,
    stock: &W,
    cart: &CartState,
    config: &ConfigState,
    cash_received: &str,
) -> Result<CheckoutOutcome, ApiError>
where
    W: StockWriter + ?Sized,
{
    debug!(cash_received = %cash_received, "complete_sale command");

    let cash = parse_cash_amount(cash_received)?;
    let (lines, quote) = cart.with_cart(|c| (c.snapshot(), c.quote(config.tax_rate())));

    let transaction = prepare_cash_transaction(lines, quote, cash, Utc::now())?;
    let transaction = db.inner().transactions().append(&transaction).await?;

    cart.with_cart_mut(|c| c.settle(&transaction.lines));

    info!(
        id = %transaction.id,
        receipt_number = %transaction.receipt_number,
        total = %transaction.total(),
        change = %transaction.change(),
        lines = transaction.lines.len(),
        "Sale recorded"
    );

    let reconciliation = reconcile_stock(db, stock, config, &transaction.lines).await;
    if !reconciliation.is_complete() {
        warn!(
            receipt_number = %transaction.receipt_number,
            failed = reconciliation.failed.len(),
            "Sale recorded but stock is out of step for some products"
        );
    }

    let receipt = ReceiptView::from_transaction(&transaction, config);

    Ok(CheckoutOutcome {
        transaction,
        receipt,
        reconciliation,
    })
}

async fn reconcile_stock<W>(
    db: &DbState,
    stock: &W,
    config: &ConfigState,
    lines: &[TransactionLine],
) -> ReconciliationReport
where
    W: StockWriter + ?Sized,
{
    let mut seen = HashSet::new();
    let ids: Vec<String> = lines
        .iter()
        .filter(|l| seen.insert(l.product_id.as_str()))
        .map(|l| l.product_id.clone())
        .collect();

    match db.inner().products().get_many(&ids).await {
        Ok(found) => {
            let catalog: Vec<Product> = found.into_values().collect();
            let plan = plan_decrements(lines, &catalog);
            apply_plan(stock, &plan, &config.retry_policy()).await
        }
        Err(err) => {
            warn!(error = %err, "Could not reload sold products, stock not adjusted");
            let mut report = ReconciliationReport::for_plan(&plan_decrements(lines, &[]));
            for failed in &mut report.failed {
                failed.reason = format!("could not load product: {err}");
            }
            report
        }
    }
}

/// The whole ledger, newest first.
pub async fn list_transactions(db: &DbState) -> Result<Vec<Transaction>, ApiError> {
    debug!("list_transactions command");
    Ok(db.inner().transactions().list().await?)
}

pub async fn recent_transactions(db: &DbState, limit: u32) -> Result<Vec<Transaction>, ApiError> {
    debug!(limit, "recent_transactions command");
    Ok(db.inner().transactions().recent(limit).await?)
}

/// Rebuilds the receipt for a past sale.
pub async fn get_receipt(
    db: &DbState,
    config: &ConfigState,
    receipt_number: String,
) -> Result<ReceiptView, ApiError> {
    debug!(receipt_number = %receipt_number, "get_receipt command");

    let transaction = db
        .inner()
        .transactions()
        .get_by_receipt(&receipt_number)
        .await?
        .ok_or_else(|| ApiError::not_found("Receipt", &receipt_number))?;

    Ok(ReceiptView::from_transaction(&transaction, config))
}

/// Receipt as fixed-width text for the printer.
pub async fn print_receipt(
    db: &DbState,
    config: &ConfigState,
    receipt_number: String,
) -> Result<String, ApiError> {
    let receipt = get_receipt(db, config, receipt_number).await?;
    Ok(receipt.render_text(RECEIPT_WIDTH))
}
