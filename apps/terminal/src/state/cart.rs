//! # Cart State
//!
//! Shared handle to the in-progress cart.

use std::sync::{Arc, Mutex, PoisonError};

use fizz_core::cart::Cart;

/// Terminal-wide cart state.
///
/// ## Thread Safety
/// `Arc<Mutex<Cart>>`: cart operations are short and nearly all of them
/// mutate, so a plain mutex is enough. A poisoned lock is recovered, since
/// every cart mutation leaves the cart consistent before it can panic.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ```rust,ignore
    /// let subtotal = cart_state.with_cart(|cart| cart.subtotal());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add(&product, Some("Mango"), Some("16oz")))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fizz_core::{Money, Product};

    fn plain_product() -> Product {
        Product {
            id: "p1".to_string(),
            sku: "CAN-01".to_string(),
            name: "Canned Soda".to_string(),
            description: None,
            category: "Drinks".to_string(),
            price_cents: 3000,
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
    fn test_clones_share_one_cart() {
        let state = CartState::new();
        let other = state.clone();

        state
            .with_cart_mut(|c| c.add(&plain_product(), None, None))
            .unwrap();

        assert_eq!(other.with_cart(|c| c.total_quantity()), 1);
        assert_eq!(other.with_cart(|c| c.subtotal()), Money::from_cents(3000));
    }

    #[test]
    fn test_survives_poisoned_lock() {
        let state = CartState::new();
        let poisoner = state.clone();

        let _ = std::thread::spawn(move || {
            poisoner.with_cart_mut(|_| panic!("boom"));
        })
        .join();

        state
            .with_cart_mut(|c| c.add(&plain_product(), None, None))
            .unwrap();
        assert_eq!(state.with_cart(|c| c.line_count()), 1);
    }
}
