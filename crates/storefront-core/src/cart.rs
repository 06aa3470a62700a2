//! # Cart Snapshot
//!
//! The cart as an immutable value. Every transition returns a NEW `Cart` and
//! leaves the receiver untouched, so a failed operation can never leave a
//! half-applied cart behind.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Snapshot Transitions                            │
//! │                                                                         │
//! │  Storefront Action        CartStore op              Snapshot change     │
//! │  ─────────────────        ────────────              ───────────────     │
//! │                                                                         │
//! │  "Add to cart" ──────────► add_product() ─────────► with_product(p)    │
//! │                                                                         │
//! │  "+" / "-" on a line ────► update_product_amount() ► with_amount(id,n)  │
//! │                                                                         │
//! │  Trash icon ─────────────► remove_product() ──────► without(id)        │
//! │                                                                         │
//! │  Checkout done ──────────► clear() ───────────────► Cart::new()        │
//! │                                                                         │
//! │  NOTE: transitions validate shape (ids, amount >= 1). Stock checks      │
//! │        happen before a transition is attempted.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CartError, CartResult};
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::validation::is_valid_amount;

/// An ordered list of line items.
///
/// ## Invariants
/// - Items are unique by `id`
/// - Every item has `amount >= 1`
/// - Insertion order is kept for display
///
/// Serializes as a bare JSON array of products, which is the persisted layout.
/// Deserializing goes through [`Cart::restore`], so invalid items never make
/// it into a `Cart`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Builds a cart from untrusted items (e.g. a persisted snapshot),
    /// dropping anything that breaks the invariants.
    ///
    /// Items with `amount < 1` are dropped. For duplicated ids the first
    /// occurrence wins. Returns the cart and the number of dropped items.
    pub fn restore(items: Vec<Product>) -> (Self, usize) {
        let received = items.len();
        let mut kept: Vec<Product> = Vec::with_capacity(received);

        for item in items {
            if !is_valid_amount(item.amount) {
                continue;
            }
            if kept.iter().any(|k| k.id == item.id) {
                continue;
            }
            kept.push(item);
        }

        let dropped = received - kept.len();
        (Cart { items: kept }, dropped)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Finds the line item for a product.
    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == product_id)
    }

    /// Checks if the product has a line item.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.find(product_id).is_some()
    }

    /// Selected amount for a product, if present.
    pub fn amount_of(&self, product_id: ProductId) -> Option<i64> {
        self.find(product_id).map(|p| p.amount)
    }

    /// Number of distinct line items (the header badge count).
    pub fn cart_size(&self) -> usize {
        self.items.len()
    }

    /// Total units across all line items, saturating at `i64::MAX`.
    pub fn total_amount(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.amount))
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cart total (sum of line subtotals).
    pub fn total(&self) -> Money {
        self.items.iter().map(Product::subtotal).sum()
    }

    /// Returns a cart holding `product` as a line item.
    ///
    /// ## Behavior
    /// - Product not in cart: appended at the end
    /// - Product already in cart: its line is replaced in place
    /// - `product.amount < 1`: `InvalidAmount`
    pub fn with_product(&self, product: Product) -> CartResult<Cart> {
        if !is_valid_amount(product.amount) {
            return Err(CartError::InvalidAmount {
                product_id: product.id,
                amount: product.amount,
            });
        }

        let mut items = self.items.clone();
        match items.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => items.push(product),
        }

        Ok(Cart { items })
    }

    /// Returns a cart where only the line for `product_id` holds `amount`.
    pub fn with_amount(&self, product_id: ProductId, amount: i64) -> CartResult<Cart> {
        if !is_valid_amount(amount) {
            return Err(CartError::InvalidAmount { product_id, amount });
        }

        if !self.contains(product_id) {
            return Err(CartError::NotFound(product_id));
        }

        let items = self
            .items
            .iter()
            .map(|p| {
                if p.id == product_id {
                    p.with_amount(amount)
                } else {
                    p.clone()
                }
            })
            .collect();

        Ok(Cart { items })
    }

    /// Returns a cart without the line for `product_id`.
    pub fn without(&self, product_id: ProductId) -> CartResult<Cart> {
        if !self.contains(product_id) {
            return Err(CartError::NotFound(product_id));
        }

        let items = self
            .items
            .iter()
            .filter(|p| p.id != product_id)
            .cloned()
            .collect();

        Ok(Cart { items })
    }

    /// Derived totals for the cart page and header.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }
}

impl From<Vec<Product>> for Cart {
    fn from(items: Vec<Product>) -> Self {
        Cart::restore(items).0
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Subtotal of a single line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineSummary {
    pub product_id: ProductId,
    pub subtotal: Money,
}

/// Cart totals summary for the storefront views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub cart_size: usize,
    #[ts(type = "number")]
    pub total_amount: i64,
    pub lines: Vec<LineSummary>,
    pub total: Money,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        CartSummary {
            cart_size: cart.cart_size(),
            total_amount: cart.total_amount(),
            lines: cart
                .items
                .iter()
                .map(|p| LineSummary {
                    product_id: p.id,
                    subtotal: p.subtotal(),
                })
                .collect(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
