//! # Receipts
//!
//! Turns a recorded [`Transaction`] into what the customer sees: a view
//! model for the UI and a fixed-width text block for the host print
//! facility.
//!
//! ```text
//!         Fruity Soda Co.
//!        Fresh Fruity Sodas
//!         123 Main Street
//! --------------------------------
//! Receipt: R1718000000000042
//! Date:    2024-06-10 14:03
//! --------------------------------
//! Fruity Soda (Mango, 16oz)
//!   2 x ₱35.00              ₱70.00
//! --------------------------------
//! Subtotal                  ₱70.00
//! TOTAL                     ₱70.00
//! Cash                     ₱100.00
//! Change                    ₱30.00
//! ```

use chrono::{DateTime, Local, TimeZone};
use fizz_core::{TaxRate, Transaction};
use serde::{Deserialize, Serialize};

use crate::state::ConfigState;

/// Default paper width in characters (58mm thermal roll).
pub const RECEIPT_WIDTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptView {
    pub transaction_id: String,
    pub receipt_number: String,
    pub store_name: String,
    pub store_tagline: String,
    pub store_address: Vec<String>,
    pub store_phone: String,
    /// Local time, `YYYY-MM-DD HH:MM`
    pub timestamp: String,
    pub payment_method: String,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: String,
    /// `None` when no tax was charged
    pub tax: Option<ReceiptTax>,
    pub total: String,
    pub cash_received: String,
    pub change: String,
    pub item_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub flavor: Option<String>,
    pub size: Option<String>,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTax {
    /// e.g. "Tax (12%)"
    pub label: String,
    pub amount: String,
}

impl ReceiptView {
    /// Builds the receipt in the terminal's local time zone.
    pub fn from_transaction(transaction: &Transaction, config: &ConfigState) -> Self {
        Self::from_transaction_in(transaction, config, &Local)
    }

    pub fn from_transaction_in<Tz>(transaction: &Transaction, config: &ConfigState, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let lines = transaction
            .lines
            .iter()
            .map(|line| ReceiptLine {
                name: line.display_name(),
                flavor: line.flavor.clone(),
                size: line.size.as_ref().map(|s| s.label.clone()),
                quantity: line.quantity,
                unit_price: config.format_money(line.unit_price()),
                line_total: config.format_money(line.line_total()),
            })
            .collect();

        let tax = (!transaction.tax_rate().is_zero() || transaction.tax_cents != 0).then(|| {
            ReceiptTax {
                label: format!("Tax ({})", rate_label(transaction.tax_rate())),
                amount: config.format_money(transaction.tax()),
            }
        });

        ReceiptView {
            transaction_id: transaction.id.clone(),
            receipt_number: transaction.receipt_number.clone(),
            store_name: config.store_name.clone(),
            store_tagline: config.store_tagline.clone(),
            store_address: config.store_address.clone(),
            store_phone: config.store_phone.clone(),
            timestamp: format_timestamp(&transaction.created_at.with_timezone(tz)),
            payment_method: transaction.payment_method.label().to_string(),
            lines,
            subtotal: config.format_money(transaction.subtotal()),
            tax,
            total: config.format_money(transaction.total()),
            cash_received: config.format_money(transaction.cash_received()),
            change: config.format_money(transaction.change()),
            item_count: transaction.item_count(),
        }
    }

    /// Plain-text rendering, `width` characters per line.
    pub fn render_text(&self, width: usize) -> String {
        let width = width.max(24);
        let rule = "-".repeat(width);
        let mut out = Vec::new();

        out.push(center(&self.store_name, width));
        if !self.store_tagline.is_empty() {
            out.push(center(&self.store_tagline, width));
        }
        for line in &self.store_address {
            out.push(center(line, width));
        }
        if !self.store_phone.is_empty() {
            out.push(center(&self.store_phone, width));
        }

        out.push(rule.clone());
        out.push(format!("Receipt: {}", self.receipt_number));
        out.push(format!("Date:    {}", self.timestamp));
        out.push(rule.clone());

        for line in &self.lines {
            out.push(line.name.clone());
            out.push(columns(
                &format!("  {} x {}", line.quantity, line.unit_price),
                &line.line_total,
                width,
            ));
        }

        out.push(rule.clone());
        out.push(columns("Subtotal", &self.subtotal, width));
        if let Some(tax) = &self.tax {
            out.push(columns(&tax.label, &tax.amount, width));
        }
        out.push(columns("TOTAL", &self.total, width));
        out.push(columns(&self.payment_method, &self.cash_received, width));
        out.push(columns("Change", &self.change, width));
        out.push(rule);
        out.push(center("Thank you!", width));

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// "12%", "8.25%", "0.5%"
fn rate_label(rate: TaxRate) -> String {
    let bps = rate.bps();
    let whole = bps / 100;
    let frac = bps % 100;
    if frac == 0 {
        format!("{}%", whole)
    } else if frac % 10 == 0 {
        format!("{}.{}%", whole, frac / 10)
    } else {
        format!("{}.{:02}%", whole, frac)
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    format!("{}{}", " ".repeat(left), text)
}

/// Left text and right-aligned value on one line; wraps the value onto its
/// own line when both do not fit.
fn columns(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    if used < width {
        format!("{}{}{}", left, " ".repeat(width - used), right)
    } else {
        format!("{}\n{:>width$}", left, right, width = width)
    }
}
