//! # Domain Types
//!
//! Core domain types used throughout Fizz POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  Transaction    │   │ TransactionLine │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  product_id     │       │
//! │  │  sku (business) │   │  receipt_number │   │  sku/name snap  │       │
//! │  │  price_cents    │   │  total_cents    │   │  flavor / size  │       │
//! │  │  stock          │   │  lines ─────────┼──►│  quantity       │       │
//! │  │  flavors/sizes  │   │  cash / change  │   │  line_total     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  SizeVariant    │   │ PaymentMethod   │       │
//! │  │  bps (u32)      │   │  label, price   │   │  Cash           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (sku, receipt_number) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1200 bps = 12%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (config files, env vars).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round().max(0.0) as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Size Variant
// =============================================================================

/// One size option of a customizable product ("16oz", ₱35, "Medium").
///
/// A chosen size replaces the product's base price for that cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SizeVariant {
    pub label: String,
    pub price_cents: i64,
    pub description: String,
}

impl SizeVariant {
    pub fn new(label: impl Into<String>, price: Money, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            price_cents: price.cents(),
            description: description.into(),
        }
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - unique merchant code.
    pub sku: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    pub description: Option<String>,

    /// Free-form category label ("Customizable", "Snacks").
    pub category: String,

    /// Base price in centavos.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Customizable products must be sold with a flavor and a size.
    pub is_customizable: bool,

    /// Flavor labels in display order.
    pub flavors: Vec<String>,

    /// Size options in display order.
    pub sizes: Vec<SizeVariant>,

    /// Image reference (URL or asset key).
    pub image: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Looks up a size option by label.
    pub fn size(&self, label: &str) -> Option<&SizeVariant> {
        self.sizes.iter().find(|s| s.label == label)
    }

    pub fn has_flavor(&self, label: &str) -> bool {
        self.flavors.iter().any(|f| f == label)
    }

    /// Whether the product can be added to a cart at all.
    ///
    /// Needs stock on hand, and a customizable product additionally needs
    /// both variant lists filled in.
    pub fn is_purchasable(&self) -> bool {
        if self.stock <= 0 {
            return false;
        }
        !self.is_customizable || (!self.flavors.is_empty() && !self.sizes.is_empty())
    }

    pub fn stock_status(&self, low_threshold: i64) -> StockStatus {
        StockStatus::classify(self.stock, low_threshold)
    }
}

// =============================================================================
// Product Draft
// =============================================================================

/// Editable product fields, as submitted by the catalog management screen.
///
/// Used for both create and update. Run
/// [`validate_product_draft`](crate::validation::validate_product_draft)
/// before handing one to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
    pub is_customizable: bool,
    #[serde(default)]
    pub flavors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<SizeVariant>,
    pub image: Option<String>,
}

// =============================================================================
// Stock Views
// =============================================================================

/// Shelf status shown next to each product on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    /// 0 (or below) is out of stock, up to `low_threshold` is low.
    pub fn classify(stock: i64, low_threshold: i64) -> Self {
        if stock <= 0 {
            StockStatus::OutOfStock
        } else if stock <= low_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}

/// A product as listed by the catalog, with its ledger-derived figures.
///
/// The mutable `stock` counter on [`Product`] is authoritative.
/// `total_sold` is summed from the ledger at read time and
/// `initial_stock` is derived from the two, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogEntry {
    pub product: Product,
    /// Units of this product across every recorded transaction.
    pub total_sold: i64,
    /// Same as `product.stock`; kept for screens that read `current_stock`.
    pub current_stock: i64,
    /// `current_stock + total_sold`.
    pub initial_stock: i64,
}

impl CatalogEntry {
    pub fn new(product: Product, total_sold: i64) -> Self {
        let current_stock = product.stock;
        Self {
            product,
            total_sold,
            current_stock,
            initial_stock: current_stock + total_sold,
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale. Immutable once recorded in the ledger.
///
/// ## Invariants
/// - `total_cents = subtotal_cents + tax_cents`
/// - `change_cents = cash_received_cents - total_cents >= 0`
/// - `lines` is a snapshot: later catalog edits never reach it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub receipt_number: String,
    pub lines: Vec<TransactionLine>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    /// Rate the tax was computed at, for receipt labels.
    pub tax_rate_bps: u32,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub cash_received_cents: i64,
    pub change_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn cash_received(&self) -> Money {
        Money::from_cents(self.cash_received_cents)
    }

    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// A line item in a transaction.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionLine {
    pub product_id: String,
    /// SKU at time of sale (frozen).
    pub sku_snapshot: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    pub flavor: Option<String>,
    pub size: Option<SizeVariant>,
    /// Effective unit price at time of sale (size price or base price).
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// `unit_price_cents × quantity`.
    pub line_total_cents: i64,
}

impl TransactionLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }

    /// "Fruity Soda (Mango, 16oz)" style label for receipts.
    pub fn display_name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(flavor) = &self.flavor {
            parts.push(flavor.as_str());
        }
        if let Some(size) = &self.size {
            parts.push(size.label.as_str());
        }
        if parts.is_empty() {
            self.name_snapshot.clone()
        } else {
            format!("{} ({})", self.name_snapshot, parts.join(", "))
        }
    }
}

// =============================================================================
// Ingredient Purchase
// =============================================================================

/// Cost-of-goods record kept beside the sales ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IngredientPurchase {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub cost_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl IngredientPurchase {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn soda(stock: i64) -> Product {
        Product {
            id: "p-1".to_string(),
            sku: "FS001".to_string(),
            name: "Fruity Soda".to_string(),
            description: None,
            category: "Customizable".to_string(),
            price_cents: 2500,
            stock,
            is_customizable: true,
            flavors: vec!["Lychee".to_string(), "Mango".to_string()],
            sizes: vec![
                SizeVariant::new("12oz", Money::from_cents(2500), "Small"),
                SizeVariant::new("16oz", Money::from_cents(3500), "Medium"),
            ],
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
        assert_eq!(TaxRate::from_percentage(0.0), TaxRate::zero());
        assert!((TaxRate::from_bps(1200).percentage() - 12.0).abs() < 0.001);
    }

    #[test]
    fn test_purchasable_needs_stock_and_variants() {
        assert!(soda(10).is_purchasable());
        assert!(!soda(0).is_purchasable());

        let mut no_sizes = soda(10);
        no_sizes.sizes.clear();
        assert!(!no_sizes.is_purchasable());

        let mut plain = soda(10);
        plain.is_customizable = false;
        plain.flavors.clear();
        plain.sizes.clear();
        assert!(plain.is_purchasable());
    }

    #[test]
    fn test_variant_lookup() {
        let p = soda(3);
        assert_eq!(p.size("16oz").map(|s| s.price_cents), Some(3500));
        assert!(p.size("22oz").is_none());
        assert!(p.has_flavor("Mango"));
        assert!(!p.has_flavor("mango"));
    }

    #[test]
    fn test_stock_status() {
        assert_eq!(StockStatus::classify(0, 5), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(5, 5), StockStatus::LowStock);
        assert_eq!(StockStatus::classify(6, 5), StockStatus::InStock);
        assert_eq!(soda(1).stock_status(5).label(), "Low Stock");
    }

    #[test]
    fn test_catalog_entry_derives_initial_stock() {
        let entry = CatalogEntry::new(soda(40), 60);
        assert_eq!(entry.current_stock, 40);
        assert_eq!(entry.initial_stock, 100);
    }

    #[test]
    fn test_line_display_name() {
        let line = TransactionLine {
            product_id: "p-1".to_string(),
            sku_snapshot: "FS001".to_string(),
            name_snapshot: "Fruity Soda".to_string(),
            flavor: Some("Mango".to_string()),
            size: Some(SizeVariant::new("16oz", Money::from_cents(3500), "Medium")),
            unit_price_cents: 3500,
            quantity: 2,
            line_total_cents: 7000,
        };
        assert_eq!(line.display_name(), "Fruity Soda (Mango, 16oz)");
    }
}
