//! # Stock Reconciliation
//!
//! Applies a [`ReconciliationPlan`] after a sale has been recorded.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each StockAdjustment                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  set_stock(product, new_stock) ──ok──► applied                          │
//! │       │                                                                 │
//! │       err (transient, attempts left)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sleep(next backoff) ──► retry                                          │
//! │       │                                                                 │
//! │       err (permanent, or out of attempts)                               │
//! │       ▼                                                                 │
//! │  failed { attempts, reason }                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are absolute (`stock = n`), so repeating one that actually landed
//! before its error reached us leaves the same value behind.

use std::time::Duration;

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use fizz_core::inventory::{ReconciliationPlan, ReconciliationReport};
use fizz_db::{DbResult, ProductRepository};
use tracing::{info, warn};

// =============================================================================
// Stock Writer
// =============================================================================

/// Where reconciled stock levels are written.
#[async_trait]
pub trait StockWriter: Send + Sync {
    async fn set_stock(&self, product_id: &str, stock: i64) -> DbResult<()>;
}

#[async_trait]
impl StockWriter for ProductRepository {
    async fn set_stock(&self, product_id: &str, stock: i64) -> DbResult<()> {
        ProductRepository::set_stock(self, product_id, stock).await
    }
}

// =============================================================================
// Retry Policy
// =============================================================================

/// Bounded per-product retry for stock writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per product, including the first. At least 1.
    pub max_attempts: u32,

    /// Delay before the first retry; doubles each time after.
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        RetryPolicy::new(1, Duration::ZERO)
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            // the first delay comes from current_interval, not initial_interval
            current_interval: self.initial_backoff,
            initial_interval: self.initial_backoff,
            max_interval: self.initial_backoff * 8,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_millis(50))
    }
}

// =============================================================================
// Apply
// =============================================================================

/// Writes every planned adjustment, retrying transient failures.
///
/// Never fails as a whole: products that could not be written (or were
/// already missing from the catalog) come back in `report.failed`.
pub async fn apply_plan<W>(
    writer: &W,
    plan: &ReconciliationPlan,
    policy: &RetryPolicy,
) -> ReconciliationReport
where
    W: StockWriter + ?Sized,
{
    let mut report = ReconciliationReport::for_plan(plan);

    for missing in &plan.missing {
        warn!(
            product_id = %missing.product_id,
            name = %missing.name,
            quantity_sold = missing.quantity_sold,
            "Sold product no longer in catalog, stock not adjusted"
        );
    }

    for adjustment in &plan.adjustments {
        let mut backoff = policy.backoff();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match writer.set_stock(&adjustment.product_id, adjustment.new_stock).await {
                Ok(()) => {
                    info!(
                        product_id = %adjustment.product_id,
                        previous = adjustment.previous_stock,
                        new = adjustment.new_stock,
                        attempt,
                        "Stock adjusted"
                    );
                    report.record_applied(adjustment.clone());
                    break;
                }
                Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                    let delay = backoff.next_backoff().unwrap_or(policy.initial_backoff);
                    warn!(
                        product_id = %adjustment.product_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Stock write failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    warn!(
                        product_id = %adjustment.product_id,
                        intended = adjustment.new_stock,
                        attempt,
                        error = %err,
                        "Stock write abandoned"
                    );
                    report.record_failed(adjustment, attempt, err.to_string());
                    break;
                }
            }
        }
    }

    report
}

// =============================================================================
// Unit Tests
// =============================================================================
