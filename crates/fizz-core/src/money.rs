//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floating point:                                                   │
//! │    25.10 + 35.20 = 60.300000000000004                                   │
//! │    so every total needs a round-to-2-decimals step                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer centavos                                         │
//! │    2510 + 3520 = 6030, always                                           │
//! │    Only tax and averages divide, and they round exactly once            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fizz_core::money::Money;
//!
//! let small = Money::from_cents(2500);      // ₱25.00
//! let two_small = small * 2;                // ₱50.00
//! let with_large = two_small + Money::from_cents(4500); // ₱95.00
//! assert_eq!(with_large.cents(), 9500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for PHP).
///
/// ## Design Decisions
/// - **i64 (signed)**: change can be negative while the cashier is still
///   typing the tendered amount
/// - **Single field tuple struct**: zero-cost abstraction over i64
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price / SizeVariant.price ──► CartLine.unit_price             │
/// │                                              │                          │
/// │                                              ▼                          │
/// │  subtotal ──► tax ──► total ──► change ──► Transaction (ledger)        │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                        SalesSummary / DailyIncome / net profit         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ```rust
    /// use fizz_core::money::Money;
    ///
    /// let price = Money::from_cents(2550); // ₱25.50
    /// assert_eq!(price.cents(), 2550);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -₱5.50.
    ///
    /// ```rust
    /// use fizz_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(45, 0).cents(), 4500);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major.saturating_mul(100).saturating_sub(minor))
        } else {
            Money(major.saturating_mul(100).saturating_add(minor))
        }
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (pesos) portion, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax on this amount, rounding half-up to the centavo.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 is the
    /// half-unit that turns truncation into round-to-nearest.
    ///
    /// ```rust
    /// use fizz_core::money::Money;
    /// use fizz_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(1000); // ₱10.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(825)); // 8.25%
    /// // ₱0.825 rounds to ₱0.83
    /// assert_eq!(tax.cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large subtotals cannot overflow the intermediate product
        let scaled = self.0 as i128 * rate.bps() as i128;
        let tax_cents = if scaled >= 0 {
            (scaled + 5000) / 10000
        } else {
            (scaled - 5000) / 10000
        };
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies a unit price by a line quantity, saturating at the `i64`
    /// bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Divides evenly into `parts`, rounding half away from zero.
    ///
    /// Returns zero when `parts` is zero, which is what an average over an
    /// empty set should show.
    ///
    /// ```rust
    /// use fizz_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).divide_rounded(3).cents(), 333);
    /// assert_eq!(Money::from_cents(1001).divide_rounded(2).cents(), 501);
    /// assert_eq!(Money::from_cents(1000).divide_rounded(0).cents(), 0);
    /// ```
    pub fn divide_rounded(&self, parts: i64) -> Money {
        if parts == 0 {
            return Money::zero();
        }
        let num = self.0 as i128;
        let den = parts as i128;
        let half = den.abs() / 2;
        let adjusted = if (num >= 0) == (den > 0) {
            num.abs() + half
        } else {
            -(num.abs() + half)
        };
        Money::from_cents((adjusted / den.abs()) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering with the peso sign and no thousands grouping.
///
/// Store-facing formatting (grouping, configured symbol) lives in the
/// terminal's `ConfigState::format_currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₱{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(2599);
        assert_eq!(money.cents(), 2599);
        assert_eq!(money.major(), 25);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(2500)), "₱25.00");
        assert_eq!(format!("{}", Money::from_cents(5)), "₱0.05");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-₱5.50");
        assert_eq!(format!("{}", Money::zero()), "₱0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(4500);
        let b = Money::from_cents(2500);

        assert_eq!((a + b).cents(), 7000);
        assert_eq!((a - b).cents(), 2000);
        assert_eq!((b * 3).cents(), 7500);

        let mut running = Money::zero();
        running += a;
        running -= b;
        assert_eq!(running.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_cents(i64::MAX / 2 + 1);

        assert_eq!(huge.multiply_quantity(2).cents(), i64::MAX);
        assert_eq!((huge * 3).cents(), i64::MAX);
        assert_eq!((huge + huge).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - huge).cents(), i64::MIN);

        let total: Money = vec![huge, huge, huge].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!(Money::from_major_minor(i64::MAX, 99).cents(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let lines = vec![Money::from_cents(5000), Money::from_cents(4500)];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 9500);

        let empty: Vec<Money> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_tax_zero_rate_is_zero() {
        for cents in [0, 1, 99, 2500, 123_456_789] {
            assert!(Money::from_cents(cents).calculate_tax(TaxRate::zero()).is_zero());
        }
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // ₱10.00 at 8.25% = ₱0.825 → ₱0.83
        assert_eq!(Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825)).cents(), 83);
        // ₱10.00 at 8.24% = ₱0.824 → ₱0.82
        assert_eq!(Money::from_cents(1000).calculate_tax(TaxRate::from_bps(824)).cents(), 82);
        // ₱95.00 at 12% = ₱11.40
        assert_eq!(Money::from_cents(9500).calculate_tax(TaxRate::from_bps(1200)).cents(), 1140);
    }

    #[test]
    fn test_divide_rounded() {
        assert_eq!(Money::from_cents(9500).divide_rounded(2).cents(), 4750);
        assert_eq!(Money::from_cents(100).divide_rounded(3).cents(), 33);
        assert_eq!(Money::from_cents(200).divide_rounded(3).cents(), 67);
        assert_eq!(Money::from_cents(-200).divide_rounded(3).cents(), -67);
        assert_eq!(Money::from_cents(500).divide_rounded(0).cents(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-1);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 1);
    }
}
