//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CartError        - What a cart operation reports                  │
//! │  └── ValidationError  - Field-level failures in catalog data           │
//! │                                                                         │
//! │  storefront-cart errors (separate crate)                               │
//! │  └── StoreError       - Storage, network and config failures           │
//! │                                                                         │
//! │  Flow: ValidationError ─┐                                              │
//! │                         ├──► CartError ──► notification + typed result │
//! │        StoreError ──────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, amounts)
//! 3. Every `CartError` maps to a machine-readable `ErrorCode`

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::types::ProductId;

// =============================================================================
// Cart Error
// =============================================================================

/// Errors reported by cart operations.
///
/// Whatever the variant, the cart snapshot is left exactly as it was before
/// the failed operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    /// Requested amount exceeds available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "+" on a line holding 5
    ///      │
    ///      ▼
    /// Stock lookup: available = 5
    ///      │
    ///      ▼
    /// OutOfStock { product_id: 1, requested: 6, available: 5 }
    ///      │
    ///      ▼
    /// Toast: "Requested quantity is out of stock"
    /// ```
    #[error("Product {product_id} is out of stock: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The operation targets a product that is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// Product or stock lookup failed, or returned malformed data.
    #[error("Catalog lookup failed: {0}")]
    LookupFailed(String),

    /// Amount below 1 requested under the rejecting policy.
    #[error("Invalid amount {amount} for product {product_id}: must be at least 1")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    /// The new snapshot could not be persisted.
    #[error("Failed to persist cart: {0}")]
    StorageFailed(String),
}

impl CartError {
    /// Machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CartError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CartError::NotFound(_) => ErrorCode::NotFound,
            CartError::LookupFailed(_) => ErrorCode::LookupFailed,
            CartError::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            CartError::StorageFailed(_) => ErrorCode::StorageFailed,
        }
    }

    /// Returns true if the failure is about stock availability.
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, CartError::OutOfStock { .. })
    }
}

/// Malformed catalog data is reported as a failed lookup.
impl From<ValidationError> for CartError {
    fn from(err: ValidationError) -> Self {
        CartError::LookupFailed(err.to_string())
    }
}

// =============================================================================
// Error Code
// =============================================================================

/// Error codes for front-end handling.
///
/// ## Usage in Frontend
/// ```typescript
/// switch (error.code) {
///   case 'OUT_OF_STOCK':
///     disablePlusButton();
///     break;
///   case 'LOOKUP_FAILED':
///     showRetry();
///     break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    OutOfStock,
    NotFound,
    LookupFailed,
    InvalidAmount,
    StorageFailed,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors.
///
/// Raised when catalog data doesn't meet the cart's expectations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value is not a finite number.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value exceeds the accepted maximum.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: f64 },

    /// The catalog answered for a different product than requested.
    #[error("{entity} lookup for product {requested} returned product {returned}")]
    IdMismatch {
        entity: String,
        requested: ProductId,
        returned: ProductId,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::OutOfStock {
            product_id: 1,
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Product 1 is out of stock: requested 6, available 5"
        );
        assert_eq!(CartError::NotFound(7).to_string(), "Product 7 is not in the cart");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CartError::NotFound(1).code(), ErrorCode::NotFound);
        assert_eq!(
            CartError::LookupFailed("timeout".into()).code(),
            ErrorCode::LookupFailed
        );
        assert!(CartError::OutOfStock {
            product_id: 1,
            requested: 2,
            available: 1
        }
        .is_out_of_stock());
        assert!(!CartError::StorageFailed("disk full".into()).is_out_of_stock());
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::OutOfStock).unwrap();
        assert_eq!(json, "\"OUT_OF_STOCK\"");
    }

    #[test]
    fn test_validation_converts_to_lookup_failed() {
        let err: CartError = ValidationError::Negative {
            field: "stock amount".to_string(),
        }
        .into();
        assert_eq!(
            err,
            CartError::LookupFailed("stock amount must not be negative".to_string())
        );
    }
}
