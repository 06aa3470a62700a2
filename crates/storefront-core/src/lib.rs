//! # storefront-core: Pure Cart Logic
//!
//! This crate holds the cart rules of the storefront as pure functions and
//! immutable values. It performs no I/O: storage, catalog lookups and
//! notifications live in `storefront-cart`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Cart Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront views                             │   │
//! │  │    Product list ──► Header badge ──► Cart page (amount +/-)     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               storefront-cart (CartStore)                       │   │
//! │  │    storage port • catalog port • notifier port • config         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  amounts  │  │   │
//! │  │   │   Stock   │  │           │  │  Summary  │  │  catalog  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog types (Product, Stock)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Immutable cart snapshot and derived totals
//! - [`error`] - Domain error types
//! - [`validation`] - Amount, stock and catalog data checks
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, Product};
//!
//! let sneaker = Product::new(1, "Tênis de Caminhada", 179.9, "https://img/1.jpg");
//! let cart = Cart::new().with_product(sneaker.with_amount(1)).unwrap();
//! let cart = cart.with_amount(1, 3).unwrap();
//!
//! assert_eq!(cart.amount_of(1), Some(3));
//! assert_eq!(cart.summary().total.cents(), 53970);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartSummary, LineSummary};
pub use error::{CartError, CartResult, ErrorCode, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart snapshot is persisted under.
///
/// Must match the key used by existing storefront builds.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Smallest amount a line item may hold while present in the cart.
pub const MIN_LINE_AMOUNT: i64 = 1;

/// Largest unit price (major units) accepted from the catalog.
pub const MAX_UNIT_PRICE: f64 = 1_000_000_000.0;
