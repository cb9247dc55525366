//! # Inventory Reconciler
//!
//! Works out which stock writes a completed sale requires and records how
//! they went. Applying the writes (with retries) happens in the terminal;
//! this module only plans and reports.
//!
//! ## Reconciliation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Transaction lines            Catalog (fresh read)                      │
//! │  Soda/Mango  ×2  ──┐          Soda   stock 5                            │
//! │  Soda/Grape  ×4  ──┼─► Σ per product ─► Soda: 5 − 6 → 0 (floored)       │
//! │  Chips       ×1  ──┘                    Chips: 9 − 1 → 8                │
//! │                                                                         │
//! │  ReconciliationPlan { adjustments: [Soda 5→0, Chips 9→8], missing: [] } │
//! │         │                                                               │
//! │         ▼  (terminal applies each, with retry)                          │
//! │  ReconciliationReport { applied: [...], failed: [...] }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities are summed per product before planning, so several variant
//! lines of one product produce a single write.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Product, TransactionLine};

// =============================================================================
// Stock Arithmetic
// =============================================================================

/// Stock left after selling `quantity` units, never below zero.
///
/// ```rust
/// use fizz_core::inventory::decremented_stock;
///
/// assert_eq!(decremented_stock(9, 1), 8);
/// assert_eq!(decremented_stock(5, 10), 0);
/// ```
#[inline]
pub fn decremented_stock(current: i64, quantity: i64) -> i64 {
    (current - quantity).max(0)
}

/// Ledger-derived stock: baseline minus everything sold, floored at zero.
#[inline]
pub fn derive_current_stock(initial_stock: i64, total_sold: i64) -> i64 {
    (initial_stock - total_sold).max(0)
}

/// Units sold per product id across the given lines.
pub fn quantities_by_product<'a, I>(lines: I) -> HashMap<String, i64>
where
    I: IntoIterator<Item = &'a TransactionLine>,
{
    let mut sold = HashMap::new();
    for line in lines {
        *sold.entry(line.product_id.clone()).or_insert(0) += line.quantity;
    }
    sold
}

// =============================================================================
// Plan
// =============================================================================

/// One absolute stock write.
///
/// Writes are absolute (`stock = new_stock`) rather than deltas so that
/// retrying one after an ambiguous failure cannot decrement twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockAdjustment {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub previous_stock: i64,
    pub quantity_sold: i64,
    pub new_stock: i64,
}

/// A product that appears in the sale but is no longer in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MissingProduct {
    pub product_id: String,
    pub name: String,
    pub quantity_sold: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciliationPlan {
    /// In first-seen order of the transaction lines.
    pub adjustments: Vec<StockAdjustment>,
    pub missing: Vec<MissingProduct>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty() && self.missing.is_empty()
    }
}

/// Plans the stock decrements for a sale against current catalog rows.
///
/// `catalog` only needs to contain the products the lines reference; any
/// extra rows are ignored.
pub fn plan_decrements(lines: &[TransactionLine], catalog: &[Product]) -> ReconciliationPlan {
    let sold = quantities_by_product(lines);
    let mut plan = ReconciliationPlan::default();
    let mut seen: Vec<&str> = Vec::new();

    for line in lines {
        if seen.contains(&line.product_id.as_str()) {
            continue;
        }
        seen.push(&line.product_id);

        let quantity_sold = sold.get(&line.product_id).copied().unwrap_or(0);
        match catalog.iter().find(|p| p.id == line.product_id) {
            Some(product) => plan.adjustments.push(StockAdjustment {
                product_id: product.id.clone(),
                sku: product.sku.clone(),
                name: product.name.clone(),
                previous_stock: product.stock,
                quantity_sold,
                new_stock: decremented_stock(product.stock, quantity_sold),
            }),
            None => plan.missing.push(MissingProduct {
                product_id: line.product_id.clone(),
                name: line.name_snapshot.clone(),
                quantity_sold,
            }),
        }
    }

    plan
}

// =============================================================================
// Report
// =============================================================================

/// A stock write that did not land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FailedAdjustment {
    pub product_id: String,
    pub name: String,
    pub quantity_sold: i64,
    /// Stock the write would have set, if the product was found.
    pub intended_stock: Option<i64>,
    pub attempts: u32,
    pub reason: String,
}

/// Outcome of applying a [`ReconciliationPlan`].
///
/// A non-empty `failed` list means the ledger and the stock counters now
/// disagree and an operator needs to correct stock by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciliationReport {
    pub applied: Vec<StockAdjustment>,
    pub failed: Vec<FailedAdjustment>,
}

impl ReconciliationReport {
    /// Starts a report with every missing product already marked failed.
    pub fn for_plan(plan: &ReconciliationPlan) -> Self {
        let failed = plan
            .missing
            .iter()
            .map(|m| FailedAdjustment {
                product_id: m.product_id.clone(),
                name: m.name.clone(),
                quantity_sold: m.quantity_sold,
                intended_stock: None,
                attempts: 0,
                reason: "product no longer in catalog".to_string(),
            })
            .collect();
        Self {
            applied: Vec::new(),
            failed,
        }
    }

    pub fn record_applied(&mut self, adjustment: StockAdjustment) {
        self.applied.push(adjustment);
    }

    pub fn record_failed(&mut self, adjustment: &StockAdjustment, attempts: u32, reason: impl Into<String>) {
        self.failed.push(FailedAdjustment {
            product_id: adjustment.product_id.clone(),
            name: adjustment.name.clone(),
            quantity_sold: adjustment.quantity_sold,
            intended_stock: Some(adjustment.new_stock),
            attempts,
            reason: reason.into(),
        });
    }

    /// True when every planned write landed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: id.to_uppercase(),
            name: format!("Product {id}"),
            description: None,
            category: "General".to_string(),
            price_cents: 2500,
            stock,
            is_customizable: false,
            flavors: Vec::new(),
            sizes: Vec::new(),
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(product_id: &str, flavor: Option<&str>, quantity: i64) -> TransactionLine {
        TransactionLine {
            product_id: product_id.to_string(),
            sku_snapshot: product_id.to_uppercase(),
            name_snapshot: format!("Product {product_id}"),
            flavor: flavor.map(str::to_string),
            size: None,
            unit_price_cents: 2500,
            quantity,
            line_total_cents: 2500 * quantity,
        }
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        assert_eq!(decremented_stock(5, 10), 0);
        assert_eq!(decremented_stock(5, 5), 0);
        assert_eq!(decremented_stock(5, 2), 3);
    }

    #[test]
    fn test_derive_current_stock() {
        assert_eq!(derive_current_stock(100, 30), 70);
        assert_eq!(derive_current_stock(10, 12), 0);
    }

    #[test]
    fn test_plan_aggregates_variant_lines() {
        let lines = vec![
            line("soda", Some("Mango"), 2),
            line("chips", None, 1),
            line("soda", Some("Grape"), 4),
        ];
        let catalog = vec![product("chips", 9), product("soda", 5)];

        let plan = plan_decrements(&lines, &catalog);

        assert!(plan.missing.is_empty());
        assert_eq!(plan.adjustments.len(), 2);
        assert_eq!(plan.adjustments[0].product_id, "soda");
        assert_eq!(plan.adjustments[0].quantity_sold, 6);
        assert_eq!(plan.adjustments[0].new_stock, 0);
        assert_eq!(plan.adjustments[1].product_id, "chips");
        assert_eq!(plan.adjustments[1].new_stock, 8);
    }

    #[test]
    fn test_plan_reports_missing_products() {
        let lines = vec![line("gone", None, 3)];
        let plan = plan_decrements(&lines, &[]);

        assert!(plan.adjustments.is_empty());
        assert_eq!(plan.missing.len(), 1);
        assert_eq!(plan.missing[0].quantity_sold, 3);

        let report = ReconciliationReport::for_plan(&plan);
        assert!(!report.is_complete());
        assert_eq!(report.failed[0].intended_stock, None);
    }

    #[test]
    fn test_report_records_outcomes() {
        let plan = plan_decrements(&[line("a", None, 1), line("b", None, 1)], &[product("a", 3), product("b", 3)]);
        let mut report = ReconciliationReport::for_plan(&plan);
        assert!(report.is_complete());

        report.record_applied(plan.adjustments[0].clone());
        report.record_failed(&plan.adjustments[1], 3, "database is locked");

        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.failed[0].attempts, 3);
        assert_eq!(report.failed[0].intended_stock, Some(2));
        assert!(!report.is_complete());
    }

    #[test]
    fn test_quantities_by_product() {
        let lines = vec![line("a", None, 2), line("a", Some("x"), 3), line("b", None, 1)];
        let sold = quantities_by_product(&lines);
        assert_eq!(sold["a"], 5);
        assert_eq!(sold["b"], 1);
    }
}
