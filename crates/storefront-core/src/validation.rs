//! # Validation Module
//!
//! Checks applied before a cart snapshot is replaced.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Requested amount                                             │
//! │  └── amount >= 1 (otherwise ignored or rejected, per policy)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Catalog data (THIS MODULE)                                   │
//! │  ├── stock entry answers for the requested id, amount >= 0             │
//! │  └── product has a title and a finite price in [0, MAX_UNIT_PRICE]     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stock check                                                  │
//! │  └── requested amount <= available stock                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{check_stock, validate_stock};
//! use storefront_core::Stock;
//!
//! let stock = Stock::new(1, 5);
//! validate_stock(1, &stock).unwrap();
//! assert!(check_stock(1, 3, &stock).is_ok());
//! assert!(check_stock(1, 6, &stock).is_err());
//! ```

use crate::error::{CartError, CartResult, ValidationError};
use crate::types::{Product, ProductId, Stock};
use crate::{MAX_UNIT_PRICE, MIN_LINE_AMOUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Amount Checks
// =============================================================================

/// Checks whether `amount` may be held by a line item.
#[inline]
pub fn is_valid_amount(amount: i64) -> bool {
    amount >= MIN_LINE_AMOUNT
}

/// Checks `requested` units against the available stock.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart page: click "+" on a line holding 4                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  stock lookup → { id: 1, amount: 4 }                                    │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  check_stock(1, 5, &stock) ← THIS FUNCTION                              │
/// │       │                                                                 │
/// │       ├── 5 > 4 → OutOfStock, line stays at 4                          │
/// │       └── OK    → line becomes 5                                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn check_stock(product_id: ProductId, requested: i64, stock: &Stock) -> CartResult<()> {
    if !stock.covers(requested) {
        return Err(CartError::OutOfStock {
            product_id,
            requested,
            available: stock.amount,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Data Validators
// =============================================================================

/// Validates a stock entry returned for `requested`.
pub fn validate_stock(requested: ProductId, stock: &Stock) -> ValidationResult<()> {
    if stock.id != requested {
        return Err(ValidationError::IdMismatch {
            entity: "stock".to_string(),
            requested,
            returned: stock.id,
        });
    }

    if stock.amount < 0 {
        return Err(ValidationError::Negative {
            field: "stock amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a product record returned for `requested`.
///
/// ## Rules
/// - Must answer for the requested id
/// - Title must not be blank
/// - Price must be finite and non-negative (zero is a free item)
/// - Price must not exceed [`MAX_UNIT_PRICE`]
pub fn validate_product(requested: ProductId, product: &Product) -> ValidationResult<()> {
    if product.id != requested {
        return Err(ValidationError::IdMismatch {
            entity: "product".to_string(),
            requested,
            returned: product.id,
        });
    }

    if product.title.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if !product.price.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "price".to_string(),
        });
    }

    if product.price < 0.0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if product.price > MAX_UNIT_PRICE {
        return Err(ValidationError::TooLarge {
            field: "price".to_string(),
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
