//! # Cart Storage
//!
//! The storage port the cart snapshot is persisted through, with a file
//! adapter for real use and an in-memory adapter for tests.
//!
//! ## Persisted Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  <data dir>/RocketShoes_cart.json   (key "@RocketShoes:cart")           │
//! │                                                                         │
//! │  [                                                                      │
//! │    { "id": 1, "title": "...", "price": 179.9, "image": "...", "amount": 2 },
//! │    { "id": 3, "title": "...", "price": 219.9, "image": "...", "amount": 1 }
//! │  ]                                                                      │
//! │                                                                         │
//! │  Written to "<file>.tmp" then renamed over the target, so a crash       │
//! │  mid-write leaves the previous snapshot in place.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use storefront_core::{Cart, Product};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Storage port for the cart snapshot.
///
/// Both calls are synchronous: the store calls `save` before it publishes a
/// new snapshot.
pub trait CartStorage: Send + Sync {
    /// Returns the persisted line items, or `None` when nothing was saved yet.
    ///
    /// Items are returned as stored; the store sanitizes them.
    fn load(&self) -> StoreResult<Option<Vec<Product>>>;

    /// Overwrites the persisted snapshot.
    fn save(&self, cart: &Cart) -> StoreResult<()>;
}

// =============================================================================
// JSON File Storage
// =============================================================================

/// One JSON file per storage key.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    /// Storage for `key` inside `dir`.
    ///
    /// Characters that are unsafe in file names are replaced, so
    /// `"@RocketShoes:cart"` lives in `RocketShoes_cart.json`.
    pub fn for_key(dir: &Path, key: &str) -> Self {
        Self::new(dir.join(format!("{}.json", file_stem(key))))
    }

    /// File the snapshot is written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "cart".to_string()
    } else {
        stem.to_string()
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> StoreResult<Option<Vec<Product>>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "No persisted cart");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let items: Vec<Product> = serde_json::from_str(&contents)?;
        debug!(path = ?self.path, items = items.len(), "Loaded persisted cart");
        Ok(Some(items))
    }

    fn save(&self, cart: &Cart) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string(cart)?;
        let temp = self.temp_path();
        std::fs::write(&temp, contents)?;
        std::fs::rename(&temp, &self.path)?;

        debug!(path = ?self.path, items = cart.cart_size(), "Cart persisted");
        Ok(())
    }
}

// =============================================================================
// In-Memory Storage
// =============================================================================

/// In-memory storage holding the serialized snapshot.
///
/// Stores JSON text rather than the `Cart` value so a load after a save goes
/// through the same serialization as the file adapter.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStorage {
    /// Empty storage (first run).
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `items`.
    pub fn with_items(items: &[Product]) -> StoreResult<Self> {
        Ok(Self::with_raw(serde_json::to_string(items)?))
    }

    /// Storage pre-populated with raw text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        MemoryStorage {
            slot: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// The stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes every following save fail.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> StoreResult<Option<Vec<Product>>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| StoreError::StorageFailed("storage lock poisoned".into()))?;

        match slot.as_deref() {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
        }
    }

    fn save(&self, cart: &Cart) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::StorageFailed("storage unavailable".into()));
        }

        let raw = serde_json::to_string(cart)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StoreError::StorageFailed("storage lock poisoned".into()))?;
        *slot = Some(raw);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
