//! # storefront-cart: Cart Store
//!
//! The stateful side of the storefront cart. [`CartStore`] holds the current
//! snapshot and validates every change against live catalog stock before
//! persisting and publishing it.
//!
//! ## Ports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CartStore                                      │
//! │                                                                         │
//! │   cart() / summary() / subscribe()        ◄── views (never block)       │
//! │   add_product / remove_product /          ◄── shopper actions           │
//! │   update_product_amount / clear               (serialized)              │
//! │                                                                         │
//! │   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                │
//! │   │ CartStorage  │   │   Catalog    │   │   Notifier   │                │
//! │   ├──────────────┤   ├──────────────┤   ├──────────────┤                │
//! │   │ JsonFile     │   │ Http         │   │ Tracing      │                │
//! │   │ Memory       │   │ Static       │   │ Channel      │                │
//! │   │              │   │              │   │ Memory       │                │
//! │   └──────────────┘   └──────────────┘   └──────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//! ```rust
//! use std::sync::Arc;
//! use storefront_cart::{CartSettings, CartStore, MemoryNotifier, MemoryStorage, StaticCatalog};
//! use storefront_core::Product;
//!
//! # tokio_test_block(async {
//! let catalog = StaticCatalog::new()
//!     .with_product(Product::new(1, "Tênis de Caminhada", 179.9, "https://img/1.jpg"), 3);
//!
//! let store = CartStore::new(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(catalog),
//!     Arc::new(MemoryNotifier::new()),
//!     CartSettings::default(),
//! );
//!
//! store.add_product(1).await.unwrap();
//! store.add_product(1).await.unwrap();
//! assert_eq!(store.cart().amount_of(1), Some(2));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f);
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, HttpCatalog, StaticCatalog};
pub use config::{
    ApiSettings, CartConfig, CartSettings, CurrencySettings, FormattedLine, FormattedSummary,
    InvalidAmountPolicy, LookupMode, StorageSettings,
};
pub use error::{StoreError, StoreResult};
pub use notify::{
    ChannelNotifier, MemoryNotifier, Notification, NotificationLevel, Notifier, TracingNotifier,
};
pub use storage::{CartStorage, JsonFileStorage, MemoryStorage};
pub use store::CartStore;
