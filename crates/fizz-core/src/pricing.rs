//! # Pricing Engine
//!
//! Pure functions that turn cart lines into the four numbers on a receipt:
//! subtotal, tax, total and change.
//!
//! ```text
//! lines ──► subtotal ──► tax(rate) ──► total ──► change(cash)
//!             Σ unit×qty    half-up      sum       cash − total
//!                           rounding                (may be < 0)
//! ```
//!
//! All amounts are integer centavos, so only `tax` ever rounds. A negative
//! change means the customer has not paid enough; [`settle`] turns that
//! into an error so checkout cannot proceed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{TaxRate, TransactionLine};

// =============================================================================
// Priced Lines
// =============================================================================

/// Anything that contributes `unit_price × quantity` to a subtotal.
pub trait Priced {
    fn unit_price(&self) -> Money;
    fn quantity(&self) -> i64;

    fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity())
    }
}

impl Priced for TransactionLine {
    fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    fn quantity(&self) -> i64 {
        self.quantity
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Sum of `unit_price × quantity` over all lines. No intermediate rounding.
pub fn subtotal<'a, L, I>(lines: I) -> Money
where
    L: Priced + 'a,
    I: IntoIterator<Item = &'a L>,
{
    lines.into_iter().map(|line| line.line_total()).sum()
}

/// Tax on a subtotal, rounded half-up to the centavo.
#[inline]
pub fn tax(subtotal: Money, rate: TaxRate) -> Money {
    subtotal.calculate_tax(rate)
}

#[inline]
pub fn total(subtotal: Money, tax: Money) -> Money {
    subtotal + tax
}

/// Cash received minus total. Negative when payment is short.
#[inline]
pub fn change(total: Money, cash_received: Money) -> Money {
    cash_received - total
}

/// Change owed for a tender, or [`CoreError::InsufficientCash`] if the cash
/// does not cover the total.
pub fn settle(total: Money, cash_received: Money) -> CoreResult<Money> {
    let owed = change(total, cash_received);
    if owed.is_negative() {
        return Err(CoreError::InsufficientCash {
            total,
            received: cash_received,
        });
    }
    Ok(owed)
}

// =============================================================================
// Quote
// =============================================================================

/// Subtotal, tax and total computed together for display or checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quote {
    pub subtotal: Money,
    pub tax: Money,
    pub tax_rate: TaxRate,
    pub total: Money,
}

/// Builds a [`Quote`] from an already-summed subtotal.
pub fn quote(subtotal: Money, rate: TaxRate) -> Quote {
    let tax = tax(subtotal, rate);
    Quote {
        subtotal,
        tax,
        tax_rate: rate,
        total: total(subtotal, tax),
    }
}

/// Builds a [`Quote`] straight from priced lines.
pub fn quote_lines<'a, L, I>(lines: I, rate: TaxRate) -> Quote
where
    L: Priced + 'a,
    I: IntoIterator<Item = &'a L>,
{
    quote(subtotal(lines), rate)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Line(i64, i64);

    impl Priced for Line {
        fn unit_price(&self) -> Money {
            Money::from_cents(self.0)
        }

        fn quantity(&self) -> i64 {
            self.1
        }
    }

    #[test]
    fn test_subtotal_is_order_independent() {
        let forward = vec![Line(2500, 2), Line(4500, 1), Line(3500, 3)];
        let reversed: Vec<Line> = forward.iter().rev().map(|l| Line(l.0, l.1)).collect();
        assert_eq!(subtotal(&forward), subtotal(&reversed));
        assert_eq!(subtotal(&forward).cents(), 2500 * 2 + 4500 + 3500 * 3);
    }

    #[test]
    fn test_empty_subtotal_is_zero() {
        let lines: Vec<Line> = Vec::new();
        assert!(subtotal(&lines).is_zero());
    }

    #[test]
    fn test_zero_rate_total_equals_subtotal() {
        let q = quote(Money::from_cents(9500), TaxRate::zero());
        assert!(q.tax.is_zero());
        assert_eq!(q.total, q.subtotal);
    }

    #[test]
    fn test_total_includes_tax() {
        let q = quote(Money::from_cents(1000), TaxRate::from_bps(825));
        assert_eq!(q.tax.cents(), 83);
        assert_eq!(q.total.cents(), 1083);
    }

    #[test]
    fn test_change() {
        let hundred = Money::from_cents(10000);
        assert!(change(hundred, hundred).is_zero());
        assert!(change(hundred, Money::from_cents(9999)).is_negative());
        assert_eq!(change(Money::from_cents(9500), hundred).cents(), 500);
    }

    #[test]
    fn test_settle_rejects_short_payment() {
        let total = Money::from_cents(10000);
        assert!(matches!(
            settle(total, Money::from_cents(9999)),
            Err(CoreError::InsufficientCash { .. })
        ));
        assert_eq!(settle(total, total).unwrap(), Money::zero());
    }

    #[test]
    fn test_two_item_scenario() {
        // 2× item A @ 25.00, 1× item B @ 45.00, rate 0, cash 100.00
        let lines = vec![Line(2500, 2), Line(4500, 1)];
        let q = quote_lines(&lines, TaxRate::zero());
        assert_eq!(q.subtotal.cents(), 9500);
        assert_eq!(q.tax.cents(), 0);
        assert_eq!(q.total.cents(), 9500);
        assert_eq!(change(q.total, Money::from_cents(10000)).cents(), 500);
    }
}
