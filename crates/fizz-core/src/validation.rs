//! # Validation Module
//!
//! Input validation for Fizz POS. Everything here runs before a command
//! reaches the gateway, so a rejected input never causes a write.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI                                                            │
//! │  └── Immediate feedback (empty fields, cash keypad)                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Terminal command (Rust)                                       │
//! │  └── THIS MODULE: business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── UNIQUE (sku, receipt_number)                                       │
//! │  └── CHECK (stock >= 0, price >= 0)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fizz_core::validation::{parse_cash_amount, validate_sku};
//!
//! assert!(validate_sku("FS001").is_ok());
//! assert_eq!(parse_cash_amount("100.5").unwrap().cents(), 10050);
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductDraft;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Cash input longer than this many whole-peso digits is rejected outright.
const MAX_CASH_INTEGER_DIGITS: usize = 12;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ```rust
/// use fizz_core::validation::validate_sku;
///
/// assert!(validate_sku("FS-001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("FS 001").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: required, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity (1..=999).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in centavos. Zero is allowed (free items), and
/// nothing above [`MAX_PRICE_CENTS`].
///
/// ```rust
/// use fizz_core::validation::validate_price_cents;
/// use fizz_core::MAX_PRICE_CENTS;
///
/// assert!(validate_price_cents("price", 2500).is_ok());
/// assert!(validate_price_cents("price", 0).is_ok());
/// assert!(validate_price_cents("price", -100).is_err());
/// assert!(validate_price_cents("price", MAX_PRICE_CENTS + 1).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates an absolute stock level (create/update product).
pub fn validate_stock_level(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock adjustment amount for add-stock and restock.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Inventory: Add Stock                                                   │
/// │                                                                         │
/// │  Owner types amount: 0                                                  │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_stock_amount(0) ← THIS FUNCTION                               │
/// │       │                                                                 │
/// │       ├── amount <= 0? → Error, nothing written                         │
/// │       │                                                                 │
/// │       └── OK → gateway add_stock / restock                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_stock_amount(amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates an ingredient cost entry: positive quantity, non-negative cost.
pub fn validate_ingredient_cost(quantity: i64, cost_cents: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    validate_price_cents("cost", cost_cents)
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Cash Input
// =============================================================================

/// Parses cash typed at the tender screen into centavos.
///
/// ## Rules
/// - Digits with at most one decimal point
/// - At most two digits after the point
/// - `"100"`, `"100."`, `"99.5"`, `".50"` are accepted
/// - `""`, `"."`, `"1.234"`, `"-5"`, `"1e3"` are rejected
pub fn parse_cash_amount(input: &str) -> ValidationResult<Money> {
    let input = input.trim();

    if input.is_empty() || input == "." {
        return Err(ValidationError::Required {
            field: "cash received".to_string(),
        });
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits_only(whole) || !digits_only(fraction) {
        return Err(ValidationError::InvalidFormat {
            field: "cash received".to_string(),
            reason: "must be a number with at most two decimals".to_string(),
        });
    }

    if fraction.len() > 2 {
        return Err(ValidationError::InvalidFormat {
            field: "cash received".to_string(),
            reason: "at most two decimal places are allowed".to_string(),
        });
    }

    if whole.len() > MAX_CASH_INTEGER_DIGITS {
        return Err(ValidationError::TooLong {
            field: "cash received".to_string(),
            max: MAX_CASH_INTEGER_DIGITS,
        });
    }

    let major: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "cash received".to_string(),
            reason: "whole part is not a number".to_string(),
        })?
    };

    // "5" after the point means 50 centavos
    let minor: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().unwrap_or(0) * 10,
        _ => fraction.parse::<i64>().unwrap_or(0),
    };

    Ok(Money::from_major_minor(major, minor))
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size before a new line is appended.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

/// Validates a product id.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Product Draft
// =============================================================================

/// Validates every field of a product create/update form.
///
/// Name and SKU are required; prices and stock must not be negative;
/// flavor and size labels must be non-empty and unique within the product.
pub fn validate_product_draft(draft: &ProductDraft) -> ValidationResult<()> {
    validate_product_name(&draft.name)?;
    validate_sku(&draft.sku)?;
    validate_price_cents("price", draft.price_cents)?;
    validate_stock_level(draft.stock)?;

    let mut seen = HashSet::new();
    for flavor in &draft.flavors {
        let label = flavor.trim();
        if label.is_empty() {
            return Err(ValidationError::Required {
                field: "flavor".to_string(),
            });
        }
        if !seen.insert(label) {
            return Err(ValidationError::Duplicate {
                field: "flavor".to_string(),
                value: label.to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for size in &draft.sizes {
        let label = size.label.trim();
        if label.is_empty() {
            return Err(ValidationError::Required {
                field: "size label".to_string(),
            });
        }
        if !seen.insert(label) {
            return Err(ValidationError::Duplicate {
                field: "size".to_string(),
                value: label.to_string(),
            });
        }
        validate_price_cents("size price", size.price_cents)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SizeVariant;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Fruity Soda".to_string(),
            sku: "FS001".to_string(),
            category: "Customizable".to_string(),
            price_cents: 2500,
            stock: 100,
            is_customizable: true,
            flavors: vec!["Lychee".to_string(), "Mango".to_string()],
            sizes: vec![SizeVariant::new("12oz", Money::from_cents(2500), "Small")],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("FS001").is_ok());
        assert!(validate_sku("fs-001_a").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Fruity Soda").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_stock_amount() {
        assert!(validate_stock_amount(1).is_ok());
        assert!(matches!(
            validate_stock_amount(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_stock_amount(-3).is_err());
    }

    #[test]
    fn test_validate_price_ceiling() {
        assert!(validate_price_cents("price", MAX_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents("price", MAX_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { max, .. }) if max == MAX_PRICE_CENTS
        ));

        let mut big_base = draft();
        big_base.price_cents = i64::MAX / 2 + 1;
        assert!(matches!(
            validate_product_draft(&big_base),
            Err(ValidationError::OutOfRange { field, .. }) if field == "price"
        ));

        let mut big_size = draft();
        big_size.sizes[0].price_cents = i64::MAX;
        assert!(matches!(
            validate_product_draft(&big_size),
            Err(ValidationError::OutOfRange { field, .. }) if field == "size price"
        ));

        assert!(validate_ingredient_cost(1, MAX_PRICE_CENTS + 1).is_err());
    }

    #[test]
    fn test_validate_ingredient_cost() {
        assert!(validate_ingredient_cost(10, 0).is_ok());
        assert!(validate_ingredient_cost(10, 15000).is_ok());
        assert!(validate_ingredient_cost(0, 100).is_err());
        assert!(validate_ingredient_cost(5, -1).is_err());
    }

    #[test]
    fn test_parse_cash_amount_accepts() {
        assert_eq!(parse_cash_amount("100").unwrap().cents(), 10000);
        assert_eq!(parse_cash_amount("100.").unwrap().cents(), 10000);
        assert_eq!(parse_cash_amount("99.5").unwrap().cents(), 9950);
        assert_eq!(parse_cash_amount("99.05").unwrap().cents(), 9905);
        assert_eq!(parse_cash_amount(".50").unwrap().cents(), 50);
        assert_eq!(parse_cash_amount(" 20 ").unwrap().cents(), 2000);
    }

    #[test]
    fn test_parse_cash_amount_rejects() {
        for bad in ["", ".", "1.234", "-5", "1e3", "12.3.4", "abc", "₱100"] {
            assert!(parse_cash_amount(bad).is_err(), "accepted {bad:?}");
        }
        assert!(parse_cash_amount(&"9".repeat(13)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_product_draft() {
        assert!(validate_product_draft(&draft()).is_ok());

        let mut missing_sku = draft();
        missing_sku.sku.clear();
        assert!(matches!(
            validate_product_draft(&missing_sku),
            Err(ValidationError::Required { field }) if field == "sku"
        ));

        let mut dup = draft();
        dup.flavors.push("Mango".to_string());
        assert!(matches!(
            validate_product_draft(&dup),
            Err(ValidationError::Duplicate { .. })
        ));

        let mut negative_size = draft();
        negative_size.sizes[0].price_cents = -1;
        assert!(validate_product_draft(&negative_size).is_err());

        let mut negative_stock = draft();
        negative_stock.stock = -1;
        assert!(validate_product_draft(&negative_stock).is_err());
    }
}
