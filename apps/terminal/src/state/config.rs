//! # Configuration State
//!
//! Store-level settings: receipt header, currency, tax rate, low-stock
//! threshold and the retry policy for post-sale stock writes.

use std::time::Duration;

use fizz_core::validation::validate_tax_rate_bps;
use fizz_core::{Money, TaxRate, DEFAULT_LOW_STOCK_THRESHOLD};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::reconcile::RetryPolicy;

/// Application configuration.
///
/// Defaults suit a single-counter shop; override with `FIZZ_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (receipt header)
    pub store_name: String,

    /// Line under the store name on receipts
    pub store_tagline: String,

    /// Store address lines (for receipts)
    pub store_address: Vec<String>,

    pub store_phone: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Sales tax in basis points, 0 = no tax
    pub tax_rate_bps: u32,

    /// Products at or below this stock level show on the dashboard
    pub low_stock_threshold: i64,

    /// Attempts per product when writing stock after a sale
    pub stock_retry_attempts: u32,

    /// Base delay between those attempts
    pub stock_retry_backoff_ms: u64,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Fruity Soda Co.".to_string(),
            store_tagline: "Fresh Fruity Sodas".to_string(),
            store_address: vec!["123 Main Street".to_string(), "Manila, Philippines".to_string()],
            store_phone: "(02) 8123-4567".to_string(),
            currency_code: "PHP".to_string(),
            currency_symbol: "₱".to_string(),
            currency_decimals: 2,
            tax_rate_bps: 0,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            stock_retry_attempts: 3,
            stock_retry_backoff_ms: 50,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FIZZ_STORE_NAME`: store name
    /// - `FIZZ_TAX_RATE`: tax rate in percent (e.g., "12" or "8.25")
    /// - `FIZZ_LOW_STOCK_THRESHOLD`: low-stock cutoff
    /// - `FIZZ_STOCK_RETRY_ATTEMPTS`, `FIZZ_STOCK_RETRY_BACKOFF_MS`
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("FIZZ_STORE_NAME").filter(|s| !s.trim().is_empty()) {
            config.store_name = store_name.trim().to_string();
        }

        if let Some(raw) = lookup("FIZZ_TAX_RATE") {
            match raw.trim().parse::<f64>() {
                Ok(pct) if pct.is_finite() => {
                    let bps = TaxRate::from_percentage(pct).bps();
                    match validate_tax_rate_bps(bps) {
                        Ok(()) => config.tax_rate_bps = bps,
                        Err(e) => warn!(value = %raw, error = %e, "Ignoring FIZZ_TAX_RATE"),
                    }
                }
                _ => warn!(value = %raw, "Ignoring unparseable FIZZ_TAX_RATE"),
            }
        }

        if let Some(raw) = lookup("FIZZ_LOW_STOCK_THRESHOLD") {
            match raw.trim().parse::<i64>() {
                Ok(n) if n >= 0 => config.low_stock_threshold = n,
                _ => warn!(value = %raw, "Ignoring FIZZ_LOW_STOCK_THRESHOLD"),
            }
        }

        if let Some(raw) = lookup("FIZZ_STOCK_RETRY_ATTEMPTS") {
            match raw.trim().parse::<u32>() {
                Ok(n) if n >= 1 => config.stock_retry_attempts = n,
                _ => warn!(value = %raw, "Ignoring FIZZ_STOCK_RETRY_ATTEMPTS"),
            }
        }

        if let Some(raw) = lookup("FIZZ_STOCK_RETRY_BACKOFF_MS") {
            match raw.trim().parse::<u64>() {
                Ok(n) => config.stock_retry_backoff_ms = n,
                Err(_) => warn!(value = %raw, "Ignoring FIZZ_STOCK_RETRY_BACKOFF_MS"),
            }
        }

        config
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Retry policy for the checkout saga's stock writes.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.stock_retry_attempts,
            Duration::from_millis(self.stock_retry_backoff_ms),
        )
    }

    /// Formats a cent amount with the currency symbol and thousands
    /// separators.
    ///
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(123450), "₱1,234.50");
    /// assert_eq!(config.format_currency(-500), "-₱5.00");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_u64.pow(self.currency_decimals as u32);
        let abs = cents.unsigned_abs();
        let whole = group_thousands(abs / divisor);
        let sign = if cents < 0 { "-" } else { "" };

        if self.currency_decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency_symbol,
                whole,
                abs % divisor,
                width = self.currency_decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.currency_symbol, whole)
        }
    }

    pub fn format_money(&self, amount: Money) -> String {
        self.format_currency(amount.cents())
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(123450), "₱1,234.50");
        assert_eq!(config.format_currency(100), "₱1.00");
        assert_eq!(config.format_currency(1), "₱0.01");
        assert_eq!(config.format_currency(0), "₱0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(-500), "-₱5.00");
        assert_eq!(config.format_currency(-123456789), "-₱1,234,567.89");
    }

    #[test]
    fn test_format_currency_large() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(100_000_000), "₱1,000,000.00");
        assert_eq!(config.format_currency(99_999), "₱999.99");
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert!(config.tax_rate().is_zero());
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.retry_policy().max_attempts, 3);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("FIZZ_STORE_NAME", "Soda Stop"),
            ("FIZZ_TAX_RATE", "12"),
            ("FIZZ_LOW_STOCK_THRESHOLD", "10"),
            ("FIZZ_STOCK_RETRY_ATTEMPTS", "5"),
            ("FIZZ_STOCK_RETRY_BACKOFF_MS", "0"),
        ]));

        assert_eq!(config.store_name, "Soda Stop");
        assert_eq!(config.tax_rate_bps, 1200);
        assert_eq!(config.low_stock_threshold, 10);
        assert_eq!(config.stock_retry_attempts, 5);
        assert_eq!(config.stock_retry_backoff_ms, 0);
    }

    #[test]
    fn test_bad_values_ignored() {
        let config = ConfigState::from_lookup(lookup(&[
            ("FIZZ_TAX_RATE", "lots"),
            ("FIZZ_LOW_STOCK_THRESHOLD", "-3"),
            ("FIZZ_STOCK_RETRY_ATTEMPTS", "0"),
        ]));

        assert_eq!(config.tax_rate_bps, 0);
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.stock_retry_attempts, 3);
    }
}
