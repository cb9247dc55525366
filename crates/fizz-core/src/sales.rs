//! # Sales Aggregator
//!
//! Folds the transaction ledger into the dashboard's figures. Nothing here
//! is stored; every number is recomputed from the ledger on read.
//!
//! ## Dashboard Figures
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Timeframe window ──► SalesSummary                                      │
//! │  (today / 7d / 30d /   ├── total_sales        Σ total                   │
//! │   all)                 ├── transaction_count                            │
//! │                        ├── average_order_value total / count (0 if none)│
//! │                        └── top_products       by revenue, top 5         │
//! │                                                                         │
//! │  Whole ledger      ──► daily_income          Σ total per local date     │
//! │  Catalog           ──► low_stock             stock <= threshold         │
//! │  Summary + costs   ──► net_profit            sales − ingredient costs   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::ledger::Ledger;
use crate::money::Money;
use crate::types::{Product, StockStatus, Transaction};
use crate::TOP_PRODUCTS_LIMIT;

// =============================================================================
// Timeframe
// =============================================================================

/// Dashboard reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// Since local midnight.
    Today,
    /// Since local midnight seven days ago.
    Week,
    /// Since local midnight thirty days ago.
    Month,
    /// Everything in the ledger.
    All,
}

impl Timeframe {
    /// Inclusive lower bound of the window, or `None` for all-time.
    ///
    /// `now` carries the store's time zone; "today" starts at that zone's
    /// midnight, and week/month go back whole calendar days from there.
    pub fn start<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        let days_back = match self {
            Timeframe::Today => 0,
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::All => return None,
        };

        let date = now.date_naive() - Duration::days(days_back);
        Some(local_midnight(&now.timezone(), date).unwrap_or_else(|| now.with_timezone(&Utc)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Today => "today",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::All => "all",
        }
    }
}

/// First instant of `date` in `tz`.
///
/// When a clock change skips midnight, the day starts at the first hour
/// that exists.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    (0..24).find_map(|hour| {
        let local = date.and_hms_opt(hour, 0, 0)?;
        tz.from_local_datetime(&local)
            .earliest()
            .map(|start| start.with_timezone(&Utc))
    })
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Today
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Timeframe::Today),
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "all" => Ok(Timeframe::All),
            other => Err(ValidationError::InvalidFormat {
                field: "timeframe".to_string(),
                reason: format!("'{other}' is not one of today, week, month, all"),
            }),
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Quantity and revenue for one product within a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSales {
    pub product_id: String,
    /// Name as it appeared on the first sale seen.
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub total_sales: Money,
    pub transaction_count: usize,
    pub average_order_value: Money,
    /// Revenue descending, ties in encounter order, at most five.
    pub top_products: Vec<ProductSales>,
}

impl SalesSummary {
    pub fn empty() -> Self {
        Self {
            total_sales: Money::zero(),
            transaction_count: 0,
            average_order_value: Money::zero(),
            top_products: Vec::new(),
        }
    }
}

/// Summarizes the transactions created at or after `since`.
///
/// Encounter order matters for top-product ties: pass transactions in the
/// order they are displayed (newest first).
pub fn summarize<'a, I>(transactions: I, since: Option<DateTime<Utc>>) -> SalesSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut total_sales = Money::zero();
    let mut transaction_count = 0usize;
    let mut products: Vec<ProductSales> = Vec::new();

    let in_window = |t: &&Transaction| since.map_or(true, |start| t.created_at >= start);

    for transaction in transactions.into_iter().filter(in_window) {
        total_sales += transaction.total();
        transaction_count += 1;

        for line in &transaction.lines {
            let revenue = line.unit_price().multiply_quantity(line.quantity);
            match products.iter_mut().find(|p| p.product_id == line.product_id) {
                Some(entry) => {
                    entry.quantity_sold += line.quantity;
                    entry.revenue += revenue;
                }
                None => products.push(ProductSales {
                    product_id: line.product_id.clone(),
                    name: line.name_snapshot.clone(),
                    quantity_sold: line.quantity,
                    revenue,
                }),
            }
        }
    }

    // sort_by is stable, so equal revenue keeps encounter order
    products.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    products.truncate(TOP_PRODUCTS_LIMIT);

    SalesSummary {
        total_sales,
        transaction_count,
        average_order_value: total_sales.divide_rounded(transaction_count as i64),
        top_products: products,
    }
}

/// Summarizes a ledger for a timeframe ending at `now`.
pub fn summarize_ledger<Tz: TimeZone>(
    ledger: &Ledger,
    timeframe: Timeframe,
    now: &DateTime<Tz>,
) -> SalesSummary {
    summarize(ledger.newest_first(), timeframe.start(now))
}

// =============================================================================
// Low Stock
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LowStockItem {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub stock: i64,
    pub status: StockStatus,
}

/// Products with stock at or below `threshold`, in catalog order.
pub fn low_stock(products: &[Product], threshold: i64) -> Vec<LowStockItem> {
    products
        .iter()
        .filter(|p| p.stock <= threshold)
        .map(|p| LowStockItem {
            product_id: p.id.clone(),
            sku: p.sku.clone(),
            name: p.name.clone(),
            stock: p.stock,
            status: p.stock_status(threshold),
        })
        .collect()
}

// =============================================================================
// Daily Income
// =============================================================================

/// One point of the income trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyIncome {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total: Money,
    pub transaction_count: usize,
}

/// Groups every transaction by its calendar date in `tz`, ascending.
///
/// Not limited to a timeframe: the trend chart always shows full history.
pub fn daily_income<'a, I, Tz>(transactions: I, tz: &Tz) -> Vec<DailyIncome>
where
    I: IntoIterator<Item = &'a Transaction>,
    Tz: TimeZone,
{
    let mut days: BTreeMap<NaiveDate, (Money, usize)> = BTreeMap::new();

    for transaction in transactions {
        let date = transaction.created_at.with_timezone(tz).date_naive();
        let day = days.entry(date).or_insert((Money::zero(), 0));
        day.0 += transaction.total();
        day.1 += 1;
    }

    days.into_iter()
        .map(|(date, (total, transaction_count))| DailyIncome {
            date,
            total,
            transaction_count,
        })
        .collect()
}

// =============================================================================
// Profit
// =============================================================================

/// Sales minus ingredient spend. Negative when costs exceed sales.
#[inline]
pub fn net_profit(total_sales: Money, ingredient_costs: Money) -> Money {
    total_sales - ingredient_costs
}

// =============================================================================
// Unit Tests
// =============================================================================
