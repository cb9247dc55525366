//! # Cart Manager
//!
//! The in-memory list of selections for the sale in progress.
//!
//! ## Line Identity
//! A line is identified by `(product id, flavor or "", size or "")`. Adding
//! a selection whose key already exists bumps that line's quantity instead
//! of appending a second line.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add(Fruity Soda, Mango, 16oz)   → [Soda/Mango/16oz ×1]                 │
//! │  add(Fruity Soda, Mango, 16oz)   → [Soda/Mango/16oz ×2]                 │
//! │  add(Fruity Soda, Grape, 16oz)   → [Soda/Mango/16oz ×2,                 │
//! │                                     Soda/Grape/16oz ×1]                 │
//! │  set_quantity(Soda/Mango/16oz,0) → [Soda/Grape/16oz ×1]                 │
//! │  clear()                         → []                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart has a single writer. Sharing it across commands is the
//! terminal's job (`CartState`), not this module's.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{self, Priced, Quote};
use crate::types::{Product, SizeVariant, TaxRate, TransactionLine};
use crate::validation::validate_cart_size;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Line Key
// =============================================================================

/// Merge identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineKey {
    pub product_id: String,
    /// Flavor label, empty when none was chosen.
    pub flavor: String,
    /// Size label, empty when none was chosen.
    pub size: String,
}

impl LineKey {
    pub fn new(product_id: &str, flavor: Option<&str>, size: Option<&str>) -> Self {
        Self {
            product_id: product_id.to_string(),
            flavor: flavor.unwrap_or_default().to_string(),
            size: size.unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.product_id, self.flavor, self.size)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One distinct selection in the cart.
///
/// `product` is a frozen copy taken when the line was first added, so the
/// line keeps its price even if the catalog changes mid-sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product: Product,
    pub flavor: Option<String>,
    pub size: Option<SizeVariant>,
    pub quantity: i64,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn key(&self) -> LineKey {
        LineKey::new(
            &self.product.id,
            self.flavor.as_deref(),
            self.size.as_ref().map(|s| s.label.as_str()),
        )
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id
            && self.flavor.as_deref().unwrap_or_default() == key.flavor
            && self.size.as_ref().map(|s| s.label.as_str()).unwrap_or_default() == key.size
    }

    /// Freezes this line into the ledger's snapshot shape.
    pub fn to_transaction_line(&self) -> TransactionLine {
        TransactionLine {
            product_id: self.product.id.clone(),
            sku_snapshot: self.product.sku.clone(),
            name_snapshot: self.product.name.clone(),
            flavor: self.flavor.clone(),
            size: self.size.clone(),
            unit_price_cents: self.unit_price().cents(),
            quantity: self.quantity,
            line_total_cents: self.line_total().cents(),
        }
    }
}

impl Priced for CartLine {
    /// Size price when a size is chosen, otherwise the base price.
    fn unit_price(&self) -> Money {
        match &self.size {
            Some(size) => size.price(),
            None => self.product.price(),
        }
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by [`LineKey`]
/// - Every line has `1 <= quantity <= 999`
/// - At most 100 lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds one unit of a selection, merging into an existing line.
    ///
    /// ## Rejected Selections
    /// - product stock is 0 or less
    /// - customizable product with an empty flavor or size list
    /// - customizable product without a chosen flavor or size
    /// - flavor or size label the product does not offer
    ///
    /// ## Returns
    /// The key of the line that now holds the selection.
    pub fn add(
        &mut self,
        product: &Product,
        flavor: Option<&str>,
        size: Option<&str>,
    ) -> CoreResult<LineKey> {
        let flavor = flavor.map(str::trim).filter(|f| !f.is_empty());
        let size = size.map(str::trim).filter(|s| !s.is_empty());

        check_selection(product, flavor, size)?;

        let key = LineKey::new(&product.id, flavor, size);

        if let Some(line) = self.lines.iter_mut().find(|l| l.matches(&key)) {
            let new_qty = line.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(key);
        }

        validate_cart_size(self.lines.len()).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        })?;

        self.lines.push(CartLine {
            product: product.clone(),
            flavor: flavor.map(str::to_string),
            size: size.and_then(|label| product.size(label)).cloned(),
            quantity: 1,
            added_at: Utc::now(),
        });
        Ok(key)
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove(key);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| l.matches(key)) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotFound(key.to_string())),
        }
    }

    pub fn remove(&mut self, key: &LineKey) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| !l.matches(key));

        if self.lines.len() == before {
            Err(CoreError::LineNotFound(key.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Takes sold lines back out of the cart after checkout.
    ///
    /// Only the sold quantity of each matching line is removed, so anything
    /// added after the snapshot was taken stays for the next sale.
    pub fn settle(&mut self, sold: &[TransactionLine]) {
        for sold_line in sold {
            let key = LineKey::new(
                &sold_line.product_id,
                sold_line.flavor.as_deref(),
                sold_line.size.as_ref().map(|s| s.label.as_str()),
            );
            if let Some(line) = self.lines.iter_mut().find(|l| l.matches(&key)) {
                line.quantity -= sold_line.quantity;
            }
        }

        self.lines.retain(|l| l.quantity > 0);
        if self.lines.is_empty() {
            self.created_at = Utc::now();
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(key))
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> Money {
        pricing::subtotal(&self.lines)
    }

    pub fn quote(&self, rate: TaxRate) -> Quote {
        pricing::quote_lines(&self.lines, rate)
    }

    /// Snapshot of every line for the ledger, in cart order.
    pub fn snapshot(&self) -> Vec<TransactionLine> {
        self.lines.iter().map(CartLine::to_transaction_line).collect()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

fn check_selection(product: &Product, flavor: Option<&str>, size: Option<&str>) -> CoreResult<()> {
    if product.stock <= 0 {
        return Err(CoreError::OutOfStock {
            name: product.name.clone(),
        });
    }

    if product.is_customizable {
        if product.flavors.is_empty() {
            return Err(not_purchasable(product, "flavor"));
        }
        if product.sizes.is_empty() {
            return Err(not_purchasable(product, "size"));
        }
        if flavor.is_none() {
            return Err(missing_variant(product, "flavor"));
        }
        if size.is_none() {
            return Err(missing_variant(product, "size"));
        }
    }

    if let Some(label) = flavor {
        if !product.has_flavor(label) {
            return Err(unknown_variant(product, "flavor", label));
        }
    }

    if let Some(label) = size {
        if product.size(label).is_none() {
            return Err(unknown_variant(product, "size", label));
        }
    }

    Ok(())
}

fn not_purchasable(product: &Product, variant: &str) -> CoreError {
    CoreError::NotPurchasable {
        product: product.name.clone(),
        variant: variant.to_string(),
    }
}

fn missing_variant(product: &Product, variant: &str) -> CoreError {
    CoreError::MissingVariant {
        product: product.name.clone(),
        variant: variant.to_string(),
    }
}

fn unknown_variant(product: &Product, variant: &str, label: &str) -> CoreError {
    CoreError::UnknownVariant {
        product: product.name.clone(),
        variant: variant.to_string(),
        label: label.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn soda() -> Product {
        Product {
            id: "soda".to_string(),
            sku: "FS001".to_string(),
            name: "Fruity Soda".to_string(),
            description: None,
            category: "Customizable".to_string(),
            price_cents: 2500,
            stock: 100,
            is_customizable: true,
            flavors: vec!["Mango".to_string(), "Grape".to_string()],
            sizes: vec![
                SizeVariant::new("12oz", Money::from_cents(2500), "Small"),
                SizeVariant::new("22oz", Money::from_cents(4500), "Large"),
            ],
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn chips(price_cents: i64) -> Product {
        Product {
            id: format!("chips-{price_cents}"),
            sku: format!("CH{price_cents}"),
            name: "Chips".to_string(),
            description: None,
            category: "Snacks".to_string(),
            price_cents,
            stock: 10,
            is_customizable: false,
            flavors: Vec::new(),
            sizes: Vec::new(),
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_same_identity_merges() {
        let mut cart = Cart::new();
        let soda = soda();

        let first = cart.add(&soda, Some("Mango"), Some("12oz")).unwrap();
        let second = cart.add(&soda, Some("Mango"), Some("12oz")).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_different_flavors_make_distinct_lines() {
        let mut cart = Cart::new();
        let soda = soda();

        cart.add(&soda, Some("Mango"), Some("12oz")).unwrap();
        cart.add(&soda, Some("Grape"), Some("12oz")).unwrap();

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_size_price_overrides_base_price() {
        let mut cart = Cart::new();
        cart.add(&soda(), Some("Mango"), Some("22oz")).unwrap();

        assert_eq!(cart.subtotal().cents(), 4500);
    }

    #[test]
    fn test_customizable_requires_both_variants() {
        let mut cart = Cart::new();
        let soda = soda();

        assert!(matches!(
            cart.add(&soda, None, Some("12oz")),
            Err(CoreError::MissingVariant { variant, .. }) if variant == "flavor"
        ));
        assert!(matches!(
            cart.add(&soda, Some("Mango"), Some("  ")),
            Err(CoreError::MissingVariant { variant, .. }) if variant == "size"
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&soda(), Some("Durian"), Some("12oz")),
            Err(CoreError::UnknownVariant { .. })
        ));
        assert!(matches!(
            cart.add(&chips(1500), Some("Mango"), None),
            Err(CoreError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_customizable_without_options_not_purchasable() {
        let mut cart = Cart::new();
        let mut soda = soda();
        soda.flavors.clear();

        assert!(matches!(
            cart.add(&soda, Some("Mango"), Some("12oz")),
            Err(CoreError::NotPurchasable { .. })
        ));
    }

    #[test]
    fn test_out_of_stock_rejected() {
        let mut cart = Cart::new();
        let mut product = chips(1500);
        product.stock = 0;

        assert!(matches!(
            cart.add(&product, None, None),
            Err(CoreError::OutOfStock { .. })
        ));
    }

    #[test]
    fn test_set_quantity_zero_removes_exactly_one_line() {
        let mut cart = Cart::new();
        let soda = soda();
        let mango = cart.add(&soda, Some("Mango"), Some("12oz")).unwrap();
        cart.add(&soda, Some("Grape"), Some("12oz")).unwrap();
        cart.add(&chips(1500), None, None).unwrap();

        cart.set_quantity(&mango, 0).unwrap();

        assert_eq!(cart.line_count(), 2);
        assert!(cart.line(&mango).is_none());
    }

    #[test]
    fn test_set_quantity_updates_and_caps() {
        let mut cart = Cart::new();
        let key = cart.add(&chips(1500), None, None).unwrap();

        cart.set_quantity(&key, 4).unwrap();
        assert_eq!(cart.subtotal().cents(), 6000);

        assert!(matches!(
            cart.set_quantity(&key, MAX_ITEM_QUANTITY + 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_remove_missing_line() {
        let mut cart = Cart::new();
        let key = LineKey::new("nope", None, None);
        assert!(matches!(cart.remove(&key), Err(CoreError::LineNotFound(_))));
        assert!(matches!(
            cart.set_quantity(&key, 2),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_cart_size_limit() {
        let mut cart = Cart::new();
        for price in 1..=MAX_CART_ITEMS as i64 {
            cart.add(&chips(price), None, None).unwrap();
        }
        assert!(matches!(
            cart.add(&chips(10_000), None, None),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let mut cart = Cart::new();
        let mut soda = soda();
        cart.add(&soda, Some("Mango"), Some("22oz")).unwrap();
        cart.add(&soda, Some("Mango"), Some("22oz")).unwrap();

        soda.name = "Renamed".to_string();
        let lines = cart.snapshot();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name_snapshot, "Fruity Soda");
        assert_eq!(lines[0].unit_price_cents, 4500);
        assert_eq!(lines[0].line_total_cents, 9000);
        assert_eq!(lines[0].size.as_ref().map(|s| s.label.as_str()), Some("22oz"));
    }

    #[test]
    fn test_settle_keeps_lines_added_after_snapshot() {
        let mut cart = Cart::new();
        let soda = soda();
        let chips = chips(1500);

        let soda_key = cart.add(&soda, Some("Mango"), Some("12oz")).unwrap();
        let sold = cart.snapshot();

        // rung up while the sale was being recorded
        cart.add(&soda, Some("Mango"), Some("12oz")).unwrap();
        let chips_key = cart.add(&chips, None, None).unwrap();

        cart.settle(&sold);

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.line(&soda_key).unwrap().quantity, 1);
        assert_eq!(cart.line(&chips_key).unwrap().quantity, 1);

        let rest = cart.snapshot();
        cart.settle(&rest);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&chips(1500), None, None).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.subtotal().is_zero());
    }
}
