//! # Catalog Lookups
//!
//! The catalog port answers "what is this product" and "how many are left".
//! The cart never caches either answer: every mutation that can grow a line
//! asks again.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog API (HttpCatalog)                         │
//! │                                                                         │
//! │  PER_ITEM                              BULK                             │
//! │  ────────                              ────                             │
//! │  GET {base}/products/{id}  → Product   GET {base}/products → [Product]  │
//! │  GET {base}/stock/{id}     → Stock     GET {base}/stock    → [Stock]    │
//! │                                                                         │
//! │  Non-2xx status ─────► HttpStatus    ─┐                                 │
//! │  Connect / timeout ──► Network        ├──► CartError::LookupFailed      │
//! │  Bad JSON ───────────► Decode         │                                 │
//! │  Missing in listing ─► NotInCatalog  ─┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use storefront_core::{Product, ProductId, Stock};
use tracing::{debug, warn};
use url::Url;

use crate::config::{ApiSettings, LookupMode};
use crate::error::{StoreError, StoreResult};

/// Catalog port used by the cart store.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Current stock entry for a product.
    async fn stock(&self, product_id: ProductId) -> StoreResult<Stock>;

    /// Catalog record for a product.
    async fn product(&self, product_id: ProductId) -> StoreResult<Product>;
}

// =============================================================================
// HTTP Catalog
// =============================================================================

/// Catalog backed by the storefront REST API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    mode: LookupMode,
}

impl HttpCatalog {
    /// Creates a client for the API at `base_url`.
    pub fn new(base_url: &str, timeout: Duration, mode: LookupMode) -> StoreResult<Self> {
        let parsed = Url::parse(base_url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(StoreError::InvalidUrl(format!(
                "Catalog URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(HttpCatalog {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            mode,
        })
    }

    /// Creates a client from the `[api]` settings.
    pub fn from_settings(settings: &ApiSettings) -> StoreResult<Self> {
        Self::new(&settings.base_url, settings.timeout(), settings.lookup)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint layout in use.
    pub fn mode(&self) -> LookupMode {
        self.mode
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Catalog request");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Catalog request failed");
            return Err(StoreError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn stock(&self, product_id: ProductId) -> StoreResult<Stock> {
        match self.mode {
            LookupMode::PerItem => self.get_json(&format!("stock/{}", product_id)).await,
            LookupMode::Bulk => {
                let entries: Vec<Stock> = self.get_json("stock").await?;
                entries
                    .into_iter()
                    .find(|s| s.id == product_id)
                    .ok_or(StoreError::NotInCatalog(product_id))
            }
        }
    }

    async fn product(&self, product_id: ProductId) -> StoreResult<Product> {
        match self.mode {
            LookupMode::PerItem => self.get_json(&format!("products/{}", product_id)).await,
            LookupMode::Bulk => {
                let products: Vec<Product> = self.get_json("products").await?;
                products
                    .into_iter()
                    .find(|p| p.id == product_id)
                    .ok_or(StoreError::NotInCatalog(product_id))
            }
        }
    }
}

// =============================================================================
// Static Catalog
// =============================================================================

/// In-memory catalog with adjustable stock.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, i64>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product with `available` units in stock.
    pub fn with_product(self, product: Product, available: i64) -> Self {
        self.set_stock(product.id, available);
        if let Ok(mut products) = self.products.lock() {
            products.insert(product.id, product);
        }
        self
    }

    /// Sets the available units for a product.
    pub fn set_stock(&self, product_id: ProductId, available: i64) {
        if let Ok(mut stock) = self.stock.lock() {
            stock.insert(product_id, available);
        }
    }

    /// Removes a product (and its stock) from the catalog.
    pub fn remove(&self, product_id: ProductId) {
        if let Ok(mut products) = self.products.lock() {
            products.remove(&product_id);
        }
        if let Ok(mut stock) = self.stock.lock() {
            stock.remove(&product_id);
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn stock(&self, product_id: ProductId) -> StoreResult<Stock> {
        let stock = self
            .stock
            .lock()
            .map_err(|_| StoreError::Network("catalog lock poisoned".into()))?;

        stock
            .get(&product_id)
            .map(|amount| Stock::new(product_id, *amount))
            .ok_or(StoreError::NotInCatalog(product_id))
    }

    async fn product(&self, product_id: ProductId) -> StoreResult<Product> {
        let products = self
            .products
            .lock()
            .map_err(|_| StoreError::Network("catalog lock poisoned".into()))?;

        products
            .get(&product_id)
            .cloned()
            .ok_or(StoreError::NotInCatalog(product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sneaker() -> Product {
        Product::new(1, "Tênis de Caminhada", 179.9, "https://img/1.jpg")
    }

    #[tokio::test]
    async fn test_static_catalog_lookups() {
        let catalog = StaticCatalog::new().with_product(sneaker(), 3);

        assert_eq!(catalog.stock(1).await.unwrap(), Stock::new(1, 3));
        assert_eq!(catalog.product(1).await.unwrap().title, "Tênis de Caminhada");

        catalog.set_stock(1, 0);
        assert_eq!(catalog.stock(1).await.unwrap().amount, 0);
    }

    #[tokio::test]
    async fn test_static_catalog_missing_product() {
        let catalog = StaticCatalog::new().with_product(sneaker(), 3);
        catalog.remove(1);

        assert!(matches!(
            catalog.stock(1).await,
            Err(StoreError::NotInCatalog(1))
        ));
        assert!(matches!(
            catalog.product(7).await,
            Err(StoreError::NotInCatalog(7))
        ));
    }

    #[test]
    fn test_http_catalog_trims_base_url() {
        let catalog =
            HttpCatalog::new("http://localhost:3333/", Duration::from_secs(1), LookupMode::Bulk)
                .unwrap();
        assert_eq!(catalog.base_url(), "http://localhost:3333");
        assert_eq!(catalog.mode(), LookupMode::Bulk);
    }

    #[test]
    fn test_http_catalog_rejects_bad_url() {
        assert!(HttpCatalog::new("ftp://catalog", Duration::from_secs(1), LookupMode::PerItem)
            .is_err());
        assert!(HttpCatalog::new("nope", Duration::from_secs(1), LookupMode::PerItem).is_err());
    }
}
