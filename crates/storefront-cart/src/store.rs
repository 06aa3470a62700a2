//! # Cart Store
//!
//! Owns the current cart snapshot and runs every mutation against the
//! catalog, the storage and the notifier.
//!
//! ## Concurrency
//! Mutations are serialized by an async mutex held for the whole operation,
//! lookups included. Readers never take that lock: the snapshot lives in a
//! `watch` channel and is swapped only after a successful save.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CartStore Mutation                                │
//! │                                                                         │
//! │  add_product(id) / update_product_amount(id, n) / remove_product(id)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock ─► read snapshot ─► catalog lookup ─► validate ─► next snapshot   │
//! │                                                            │            │
//! │                                                            ▼            │
//! │                                          storage.save(next)             │
//! │                                                │                        │
//! │                          ┌─────────────────────┴──────────────┐        │
//! │                          ▼ Ok                                 ▼ Err    │
//! │                 publish to subscribers                 snapshot kept    │
//! │                 return Ok(next)                        one notification │
//! │                                                        return Err(e)    │
//! │                                                                         │
//! │  Any earlier error takes the right-hand path as well.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use storefront_core::validation::{check_stock, is_valid_amount, validate_product, validate_stock};
use storefront_core::{Cart, CartError, CartResult, CartSummary, ProductId};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, HttpCatalog};
use crate::config::{
    CartConfig, CartSettings, CurrencySettings, FormattedSummary, InvalidAmountPolicy,
};
use crate::error::StoreResult;
use crate::notify::{
    Notification, Notifier, TracingNotifier, MSG_ADD_FAILED, MSG_CLEAR_FAILED, MSG_OUT_OF_STOCK,
    MSG_REMOVE_FAILED, MSG_UPDATE_FAILED,
};
use crate::storage::{CartStorage, JsonFileStorage};

/// Mutation being settled, used to pick the failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Add,
    Remove,
    Update,
    Clear,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Add => "add_product",
            Operation::Remove => "remove_product",
            Operation::Update => "update_product_amount",
            Operation::Clear => "clear",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Operation::Add => MSG_ADD_FAILED,
            Operation::Remove => MSG_REMOVE_FAILED,
            Operation::Update => MSG_UPDATE_FAILED,
            Operation::Clear => MSG_CLEAR_FAILED,
        }
    }
}

/// The shopping cart of a single shopper session.
pub struct CartStore {
    storage: Arc<dyn CartStorage>,
    catalog: Arc<dyn Catalog>,
    notifier: Arc<dyn Notifier>,
    settings: CartSettings,
    currency: CurrencySettings,

    /// Held across each whole mutation.
    mutation: Mutex<()>,

    /// Current snapshot; replaced only after a successful save.
    snapshot: watch::Sender<Arc<Cart>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("settings", &self.settings)
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Creates a store and restores the persisted snapshot.
    ///
    /// Invalid persisted items are dropped. Unreadable data starts an empty
    /// cart; the next successful mutation overwrites it.
    pub fn new(
        storage: Arc<dyn CartStorage>,
        catalog: Arc<dyn Catalog>,
        notifier: Arc<dyn Notifier>,
        settings: CartSettings,
    ) -> Self {
        let initial = match storage.load() {
            Ok(Some(items)) => {
                let (cart, dropped) = Cart::restore(items);
                if dropped > 0 {
                    warn!(
                        dropped,
                        kept = cart.cart_size(),
                        "Dropped invalid items from persisted cart"
                    );
                }
                info!(items = cart.cart_size(), "Cart restored");
                cart
            }
            Ok(None) => {
                debug!("No persisted cart, starting empty");
                Cart::new()
            }
            Err(e) => {
                warn!(error = %e, "Persisted cart is unreadable, starting empty");
                Cart::new()
            }
        };

        let (snapshot, _) = watch::channel(Arc::new(initial));

        CartStore {
            storage,
            catalog,
            notifier,
            settings,
            currency: CurrencySettings::default(),
            mutation: Mutex::new(()),
            snapshot,
        }
    }

    /// Wires the file storage, the HTTP catalog and the log notifier.
    pub fn from_config(config: &CartConfig) -> StoreResult<Self> {
        Self::from_config_with_notifier(config, Arc::new(TracingNotifier))
    }

    /// Same as [`CartStore::from_config`] with a caller-supplied notifier.
    pub fn from_config_with_notifier(
        config: &CartConfig,
        notifier: Arc<dyn Notifier>,
    ) -> StoreResult<Self> {
        config.validate()?;

        let dir = config.storage.resolve_dir()?;
        let storage = JsonFileStorage::for_key(&dir, &config.storage.key);
        info!(path = ?storage.path(), "Using file cart storage");

        let catalog = HttpCatalog::from_settings(&config.api)?;
        info!(
            base_url = %catalog.base_url(),
            mode = %catalog.mode(),
            "Using HTTP catalog"
        );

        Ok(Self::new(
            Arc::new(storage),
            Arc::new(catalog),
            notifier,
            config.cart.clone(),
        )
        .with_currency(config.currency.clone()))
    }

    /// Sets the currency used by [`CartStore::formatted_summary`].
    pub fn with_currency(mut self, currency: CurrencySettings) -> Self {
        self.currency = currency;
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current snapshot.
    pub fn cart(&self) -> Arc<Cart> {
        self.snapshot.borrow().clone()
    }

    /// Receiver that sees every committed snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.snapshot.subscribe()
    }

    /// Totals of the current snapshot.
    pub fn summary(&self) -> CartSummary {
        self.cart().summary()
    }

    /// Totals of the current snapshot rendered with the store's currency.
    pub fn formatted_summary(&self) -> FormattedSummary {
        self.currency.format_summary(&self.summary())
    }

    pub fn settings(&self) -> &CartSettings {
        &self.settings
    }

    pub fn currency(&self) -> &CurrencySettings {
        &self.currency
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// A product already in the cart goes through the amount update with
    /// `current + 1`. A new product is looked up and appended with amount 1.
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<Arc<Cart>> {
        let _guard = self.mutation.lock().await;
        let result = self.try_add(product_id).await;
        self.settle(Operation::Add, Some(product_id), result)
    }

    /// Removes a product's line.
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<Arc<Cart>> {
        let _guard = self.mutation.lock().await;
        let result = self.try_remove(product_id);
        self.settle(Operation::Remove, Some(product_id), result)
    }

    /// Sets a product's line to `amount` units, checked against stock.
    ///
    /// An amount below 1 follows the configured [`InvalidAmountPolicy`].
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> CartResult<Arc<Cart>> {
        if !is_valid_amount(amount) {
            match self.settings.invalid_amount {
                InvalidAmountPolicy::Ignore => {
                    debug!(product_id, amount, "Ignoring amount below 1");
                    return Ok(self.cart());
                }
                InvalidAmountPolicy::Reject => {
                    let err = CartError::InvalidAmount { product_id, amount };
                    return self.settle(Operation::Update, Some(product_id), Err(err));
                }
            }
        }

        let _guard = self.mutation.lock().await;
        let current = self.cart();
        let result = self.try_update(&current, product_id, amount).await;
        self.settle(Operation::Update, Some(product_id), result)
    }

    /// Empties the cart.
    pub async fn clear(&self) -> CartResult<Arc<Cart>> {
        let _guard = self.mutation.lock().await;
        let result = self.commit(Cart::new());
        self.settle(Operation::Clear, None, result)
    }

    // =========================================================================
    // Internals (mutation lock held)
    // =========================================================================

    async fn try_add(&self, product_id: ProductId) -> CartResult<Arc<Cart>> {
        let current = self.cart();

        if let Some(amount) = current.amount_of(product_id) {
            // A line already at i64::MAX can never be covered by stock
            let requested = amount.checked_add(1).ok_or(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: amount,
            })?;
            return self.try_update(&current, product_id, requested).await;
        }

        let (product, stock) = tokio::try_join!(
            self.catalog.product(product_id),
            self.catalog.stock(product_id)
        )?;

        validate_product(product_id, &product)?;
        validate_stock(product_id, &stock)?;
        check_stock(product_id, 1, &stock)?;

        let next = current.with_product(product.with_amount(1))?;
        self.commit(next)
    }

    fn try_remove(&self, product_id: ProductId) -> CartResult<Arc<Cart>> {
        let next = self.cart().without(product_id)?;
        self.commit(next)
    }

    async fn try_update(
        &self,
        current: &Cart,
        product_id: ProductId,
        amount: i64,
    ) -> CartResult<Arc<Cart>> {
        if !current.contains(product_id) {
            return Err(CartError::NotFound(product_id));
        }

        let stock = self.catalog.stock(product_id).await?;
        validate_stock(product_id, &stock)?;
        check_stock(product_id, amount, &stock)?;

        let next = current.with_amount(product_id, amount)?;
        self.commit(next)
    }

    /// Saves `next`, then publishes it. Nothing is published if the save fails.
    fn commit(&self, next: Cart) -> CartResult<Arc<Cart>> {
        self.storage.save(&next)?;

        let next = Arc::new(next);
        self.snapshot.send_replace(next.clone());
        Ok(next)
    }

    /// Logs the outcome and sends exactly one notification on failure.
    fn settle(
        &self,
        op: Operation,
        product_id: Option<ProductId>,
        result: CartResult<Arc<Cart>>,
    ) -> CartResult<Arc<Cart>> {
        match &result {
            Ok(cart) => {
                debug!(
                    op = op.name(),
                    product_id = ?product_id,
                    items = cart.cart_size(),
                    "Cart updated"
                );
            }
            Err(err) => {
                warn!(
                    op = op.name(),
                    product_id = ?product_id,
                    code = ?err.code(),
                    error = %err,
                    "Cart operation failed"
                );

                let notification = if err.is_out_of_stock() {
                    Notification::warning(MSG_OUT_OF_STOCK)
                } else {
                    Notification::error(op.failure_message())
                };
                self.notifier.notify(notification);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::notify::MemoryNotifier;
    use crate::storage::MemoryStorage;
    use storefront_core::Product;

    struct Fixture {
        storage: Arc<MemoryStorage>,
        catalog: Arc<StaticCatalog>,
        notifier: Arc<MemoryNotifier>,
        store: CartStore,
    }

    fn fixture(settings: CartSettings) -> Fixture {
        let storage = Arc::new(MemoryStorage::new());
        let walking = Product::new(1, "Tênis de Caminhada", 179.9, "https://img/1.jpg");
        let vr = Product::new(2, "Tênis VR Caminhada", 139.9, "https://img/2.jpg");
        let catalog = Arc::new(
            StaticCatalog::new()
                .with_product(walking, 5)
                .with_product(vr, 0),
        );
        let notifier = Arc::new(MemoryNotifier::new());
        let store = CartStore::new(storage.clone(), catalog.clone(), notifier.clone(), settings);

        Fixture {
            storage,
            catalog,
            notifier,
            store,
        }
    }

    #[tokio::test]
    async fn test_add_new_then_existing() {
        let f = fixture(CartSettings::default());

        let cart = f.store.add_product(1).await.unwrap();
        assert_eq!(cart.amount_of(1), Some(1));

        let cart = f.store.add_product(1).await.unwrap();
        assert_eq!(cart.amount_of(1), Some(2));
        assert_eq!(cart.cart_size(), 1);
        assert_eq!(f.storage.save_count(), 2);
        assert_eq!(f.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_add_without_stock() {
        let f = fixture(CartSettings::default());

        let err = f.store.add_product(2).await.unwrap_err();

        assert!(err.is_out_of_stock());
        assert!(f.store.cart().is_empty());
        assert_eq!(f.notifier.messages(), vec![MSG_OUT_OF_STOCK]);
        assert_eq!(f.storage.save_count(), 0);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let f = fixture(CartSettings::default());

        let err = f.store.add_product(99).await.unwrap_err();

        assert!(matches!(err, CartError::LookupFailed(_)));
        assert_eq!(f.notifier.messages(), vec![MSG_ADD_FAILED]);
    }

    #[tokio::test]
    async fn test_update_absent_product() {
        let f = fixture(CartSettings::default());

        let err = f.store.update_product_amount(1, 2).await.unwrap_err();

        assert_eq!(err, CartError::NotFound(1));
        assert_eq!(f.notifier.messages(), vec![MSG_UPDATE_FAILED]);
    }

    #[tokio::test]
    async fn test_update_lookup_failure_keeps_line() {
        let f = fixture(CartSettings::default());
        f.store.add_product(1).await.unwrap();
        f.catalog.remove(1);

        let err = f.store.update_product_amount(1, 2).await.unwrap_err();

        assert!(matches!(err, CartError::LookupFailed(_)));
        assert_eq!(f.store.cart().amount_of(1), Some(1));
    }

    #[tokio::test]
    async fn test_invalid_amount_policies() {
        let f = fixture(CartSettings::default());
        f.store.add_product(1).await.unwrap();

        let cart = f.store.update_product_amount(1, 0).await.unwrap();
        assert_eq!(cart.amount_of(1), Some(1));
        assert_eq!(f.notifier.count(), 0);
        assert_eq!(f.storage.save_count(), 1);

        let f = fixture(CartSettings {
            invalid_amount: InvalidAmountPolicy::Reject,
        });
        f.store.add_product(1).await.unwrap();

        let err = f.store.update_product_amount(1, -1).await.unwrap_err();
        assert_eq!(
            err,
            CartError::InvalidAmount {
                product_id: 1,
                amount: -1
            }
        );
        assert_eq!(f.notifier.messages(), vec![MSG_UPDATE_FAILED]);
    }

    #[tokio::test]
    async fn test_clear() {
        let f = fixture(CartSettings::default());
        f.store.add_product(1).await.unwrap();

        let cart = f.store.clear().await.unwrap();

        assert!(cart.is_empty());
        assert_eq!(f.storage.raw().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_clear_storage_failure() {
        let f = fixture(CartSettings::default());
        f.store.add_product(1).await.unwrap();
        f.storage.set_fail_saves(true);

        let err = f.store.clear().await.unwrap_err();

        assert!(matches!(err, CartError::StorageFailed(_)));
        assert_eq!(f.store.cart().cart_size(), 1);
        assert_eq!(f.notifier.messages(), vec![MSG_CLEAR_FAILED]);
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(Operation::Add.failure_message(), MSG_ADD_FAILED);
        assert_eq!(Operation::Remove.failure_message(), MSG_REMOVE_FAILED);
        assert_eq!(Operation::Update.failure_message(), MSG_UPDATE_FAILED);
        assert_eq!(Operation::Clear.failure_message(), MSG_CLEAR_FAILED);
    }
}
