//! # Store Error Types
//!
//! Infrastructure errors raised by the adapters around the cart.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Storage      │  │     Catalog             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  StorageFailed  │  │  Network                │ │
//! │  │  InvalidUrl     │  │  Serialization  │  │  HttpStatus             │ │
//! │  │  ConfigLoad/Save│  │                 │  │  Decode / NotInCatalog  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Catalog errors    ──► CartError::LookupFailed                         │
//! │  Storage errors    ──► CartError::StorageFailed                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::{CartError, ProductId};
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by configuration, storage and catalog adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid cart configuration.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(String),

    /// Invalid catalog URL.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// Reading or writing the persisted snapshot failed.
    #[error("Storage error: {0}")]
    StorageFailed(String),

    /// Snapshot could not be (de)serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    // =========================================================================
    // Catalog Errors
    // =========================================================================
    /// Request never produced a response (connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// Catalog answered with a non-success status.
    #[error("Catalog returned {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Response body was not the expected JSON.
    #[error("Invalid catalog response: {0}")]
    Decode(String),

    /// Bulk listing has no entry for the product.
    #[error("Product {0} is not in the catalog")]
    NotInCatalog(ProductId),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::StorageFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        StoreError::InvalidUrl(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return StoreError::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return StoreError::HttpStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        StoreError::Network(err.to_string())
    }
}

/// Maps infrastructure failures onto the cart's error taxonomy.
impl From<StoreError> for CartError {
    fn from(err: StoreError) -> Self {
        if err.is_lookup_error() {
            CartError::LookupFailed(err.to_string())
        } else {
            CartError::StorageFailed(err.to_string())
        }
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl StoreError {
    /// Returns true if this error came from a catalog lookup.
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            StoreError::Network(_)
                | StoreError::HttpStatus { .. }
                | StoreError::Decode(_)
                | StoreError::NotInCatalog(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidConfig(_)
                | StoreError::InvalidUrl(_)
                | StoreError::ConfigLoadFailed(_)
                | StoreError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_map_to_lookup_failed() {
        let err: CartError = StoreError::HttpStatus {
            status: 404,
            url: "http://localhost:3333/stock/9".into(),
        }
        .into();
        assert!(matches!(err, CartError::LookupFailed(_)));

        let err: CartError = StoreError::NotInCatalog(9).into();
        assert!(matches!(err, CartError::LookupFailed(_)));
    }

    #[test]
    fn test_storage_errors_map_to_storage_failed() {
        let err: CartError = StoreError::StorageFailed("disk full".into()).into();
        assert_eq!(
            err,
            CartError::StorageFailed("Storage error: disk full".into())
        );
    }

    #[test]
    fn test_categories() {
        assert!(StoreError::Network("refused".into()).is_lookup_error());
        assert!(!StoreError::Network("refused".into()).is_config_error());
        assert!(StoreError::InvalidUrl("nope".into()).is_config_error());
        assert!(!StoreError::Serialization("eof".into()).is_lookup_error());
    }
}
