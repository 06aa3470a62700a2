//! # Domain Types
//!
//! Catalog types shared by the cart, the catalog API and the storefront views.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐            ┌─────────────────────┐            │
//! │  │      Product        │            │       Stock         │            │
//! │  │  ─────────────────  │            │  ─────────────────  │            │
//! │  │  id (u32)           │            │  id (u32)           │            │
//! │  │  title              │            │  amount (available) │            │
//! │  │  price (decimal)    │            └─────────────────────┘            │
//! │  │  image (url)        │              owned by the catalog,            │
//! │  │  amount (selected)  │              queried on demand                │
//! │  └─────────────────────┘                                               │
//! │    doubles as the cart line item                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Both types serialize to exactly the JSON the catalog API serves and the
//! storefront persists:
//! ```json
//! { "id": 1, "title": "Tênis de Caminhada", "price": 179.9, "image": "https://...", "amount": 2 }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Catalog identifier of a product.
pub type ProductId = u32;

// =============================================================================
// Product
// =============================================================================

/// A catalog product, and a cart line item once `amount` is set.
///
/// The cart only interprets `id` and `amount`. `title`, `price` and `image`
/// are carried along for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalog identifier, unique within a cart.
    pub id: ProductId,

    /// Display name.
    #[serde(default)]
    pub title: String,

    /// Unit price in major currency units, as published by the catalog.
    #[serde(default)]
    pub price: f64,

    /// Product image URL.
    #[serde(default)]
    pub image: String,

    /// Units selected by the shopper.
    ///
    /// Catalog responses don't carry it, so it defaults to 0 until the cart
    /// sets it.
    #[serde(default)]
    #[ts(type = "number")]
    pub amount: i64,
}

impl Product {
    /// Creates a catalog product with no amount selected.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: f64,
        image: impl Into<String>,
    ) -> Self {
        Product {
            id,
            title: title.into(),
            price,
            image: image.into(),
            amount: 0,
        }
    }

    /// Returns a copy of this product with `amount` selected.
    pub fn with_amount(&self, amount: i64) -> Self {
        Product {
            amount,
            ..self.clone()
        }
    }

    /// Unit price in integer minor units.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_decimal(self.price)
    }

    /// Line subtotal (unit price × amount).
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.amount)
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Available inventory for a product, as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Stock {
    /// Product the entry refers to.
    pub id: ProductId,

    /// Units available for purchase.
    #[ts(type = "number")]
    pub amount: i64,
}

impl Stock {
    /// Creates a stock entry.
    #[inline]
    pub const fn new(id: ProductId, amount: i64) -> Self {
        Stock { id, amount }
    }

    /// Checks if `requested` units can be taken from this stock.
    #[inline]
    pub const fn covers(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
