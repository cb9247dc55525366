//! # Cart Commands
//!
//! Every command returns the full cart so the UI can redraw from one
//! response.

use fizz_core::cart::{Cart, LineKey};
use fizz_core::pricing::Priced;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CartState, ConfigState, DbState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    /// Pass back to `set_cart_quantity` / `remove_from_cart`
    pub key: LineKey,
    pub product_id: String,
    pub name: String,
    pub flavor: Option<String>,
    pub size: Option<String>,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub tax_rate_bps: u32,
    pub total_cents: i64,
}

impl CartResponse {
    fn build(cart: &Cart, config: &ConfigState) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|line| CartLineView {
                key: line.key(),
                product_id: line.product.id.clone(),
                name: line.product.name.clone(),
                flavor: line.flavor.clone(),
                size: line.size.as_ref().map(|s| s.label.clone()),
                unit_price_cents: line.unit_price().cents(),
                quantity: line.quantity,
                line_total_cents: line.line_total().cents(),
            })
            .collect();

        let quote = cart.quote(config.tax_rate());

        CartResponse {
            lines,
            totals: CartTotals {
                line_count: cart.line_count(),
                total_quantity: cart.total_quantity(),
                subtotal_cents: quote.subtotal.cents(),
                tax_cents: quote.tax.cents(),
                tax_rate_bps: quote.tax_rate.bps(),
                total_cents: quote.total.cents(),
            },
        }
    }
}

pub fn get_cart(cart: &CartState, config: &ConfigState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::build(c, config))
}

/// Adds one unit of a product, merging with an identical selection.
///
/// The product is read fresh so the stock check sees the current counter.
pub async fn add_to_cart(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
    product_id: String,
    flavor: Option<String>,
    size: Option<String>,
) -> Result<CartResponse, ApiError> {
    debug!(
        product_id = %product_id,
        flavor = ?flavor,
        size = ?size,
        "add_to_cart command"
    );

    let product = db
        .inner()
        .products()
        .get_by_id(&product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &product_id))?;

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        c.add(&product, flavor.as_deref(), size.as_deref())?;
        Ok(CartResponse::build(c, config))
    })
}

/// Sets a line's quantity; zero or less removes it.
pub fn set_cart_quantity(
    cart: &CartState,
    config: &ConfigState,
    key: LineKey,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(key = %key, quantity, "set_cart_quantity command");

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        c.set_quantity(&key, quantity)?;
        Ok(CartResponse::build(c, config))
    })
}

pub fn remove_from_cart(
    cart: &CartState,
    config: &ConfigState,
    key: LineKey,
) -> Result<CartResponse, ApiError> {
    debug!(key = %key, "remove_from_cart command");

    cart.with_cart_mut(|c| -> Result<CartResponse, ApiError> {
        c.remove(&key)?;
        Ok(CartResponse::build(c, config))
    })
}

pub fn clear_cart(cart: &CartState, config: &ConfigState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::build(c, config)
    })
}
