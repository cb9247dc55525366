//! # Dashboard Commands
//!
//! Figures are recomputed from the ledger on every call; nothing here is
//! stored.

use chrono::{DateTime, Local, TimeZone};
use fizz_core::ledger::Ledger;
use fizz_core::sales::{
    daily_income, low_stock, net_profit, summarize_ledger, DailyIncome, LowStockItem,
    SalesSummary, Timeframe,
};
use fizz_core::{Money, Product, Transaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

/// Transactions shown in the dashboard's recent list.
pub const RECENT_TRANSACTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub timeframe: Timeframe,
    pub summary: SalesSummary,
    pub low_stock: Vec<LowStockItem>,
    /// Whole ledger, oldest day first
    pub daily_income: Vec<DailyIncome>,
    pub ingredient_cost: Money,
    /// Timeframe sales minus all ingredient costs
    pub net_profit: Money,
    pub recent_transactions: Vec<Transaction>,
}

/// Dashboard for `timeframe` ("today", "week", "month" or "all") in the
/// terminal's local time zone.
pub async fn get_dashboard(
    db: &DbState,
    config: &ConfigState,
    timeframe: String,
) -> Result<DashboardReport, ApiError> {
    debug!(timeframe = %timeframe, "get_dashboard command");

    let timeframe: Timeframe = timeframe.parse()?;
    let db = db.inner();

    let ledger = Ledger::from_history(db.transactions().list().await?);
    let products = db.products().list_products().await?;
    let ingredient_cost = db.ingredients().total_cost().await?;

    Ok(build_report(
        &ledger,
        &products,
        ingredient_cost,
        timeframe,
        &Local::now(),
        config.low_stock_threshold,
        RECENT_TRANSACTIONS,
    ))
}

/// Assembles the dashboard from already-loaded data.
pub fn build_report<Tz: TimeZone>(
    ledger: &Ledger,
    products: &[Product],
    ingredient_cost: Money,
    timeframe: Timeframe,
    now: &DateTime<Tz>,
    low_stock_threshold: i64,
    recent_limit: usize,
) -> DashboardReport {
    let summary = summarize_ledger(ledger, timeframe, now);
    let net_profit = net_profit(summary.total_sales, ingredient_cost);

    DashboardReport {
        timeframe,
        low_stock: low_stock(products, low_stock_threshold),
        daily_income: daily_income(ledger.oldest_first(), &now.timezone()),
        ingredient_cost,
        net_profit,
        recent_transactions: ledger.recent(recent_limit).into_iter().cloned().collect(),
        summary,
    }
}
