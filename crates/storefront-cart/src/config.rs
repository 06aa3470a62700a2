//! # Cart Configuration
//!
//! Configuration for the cart store and its adapters.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_API_URL=http://localhost:3333                           │
//! │     STOREFRONT_INVALID_AMOUNT=reject                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront-cart/cart.toml (Linux)                        │
//! │     ~/Library/Application Support/com.storefront.cart/cart.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     local catalog API, per-item lookups, "@RocketShoes:cart" key       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! [api]
//! base_url = "http://localhost:3333"
//! timeout_secs = 10
//! lookup = "per_item"  # per_item | bulk
//!
//! [storage]
//! dir = "/var/lib/storefront"
//! key = "@RocketShoes:cart"
//!
//! [cart]
//! invalid_amount = "ignore"  # ignore | reject
//!
//! [currency]
//! code = "BRL"
//! symbol = "R$"
//! decimal_separator = ","
//! thousands_separator = "."
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storefront_core::{CartSummary, Money, ProductId, DEFAULT_STORAGE_KEY};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Catalog API Settings
// =============================================================================

/// How the catalog API is queried.
///
/// ```text
/// PER_ITEM (Default)                  │  BULK
/// ──────────────────                  │  ────
/// GET /products/{id}                  │  GET /products  → find by id
/// GET /stock/{id}                     │  GET /stock     → find by id
/// Small responses, one per product    │  For APIs without item routes
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    /// One request per product id.
    #[default]
    PerItem,

    /// List endpoints filtered client-side.
    Bulk,
}

impl std::fmt::Display for LookupMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupMode::PerItem => write!(f, "per_item"),
            LookupMode::Bulk => write!(f, "bulk"),
        }
    }
}

impl std::str::FromStr for LookupMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per_item" | "per-item" | "item" => Ok(LookupMode::PerItem),
            "bulk" | "list" => Ok(LookupMode::Bulk),
            other => Err(StoreError::InvalidConfig(format!(
                "Unknown lookup mode: '{}'. Valid options: per_item, bulk",
                other
            ))),
        }
    }
}

/// Catalog API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the catalog API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Endpoint layout used for lookups.
    #[serde(default)]
    pub lookup: LookupMode,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            lookup: LookupMode::default(),
        }
    }
}

impl ApiSettings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the cart snapshot is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Data directory. Defaults to the platform data directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Storage key the snapshot is saved under.
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            dir: None,
            key: default_storage_key(),
        }
    }
}

impl StorageSettings {
    /// Resolves the data directory, falling back to the platform default.
    pub fn resolve_dir(&self) -> StoreResult<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }

        directories::ProjectDirs::from("com", "storefront", "cart")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| StoreError::InvalidConfig("Could not determine data directory".into()))
    }
}

// =============================================================================
// Cart Behavior Settings
// =============================================================================

/// What `update_product_amount` does with an amount below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidAmountPolicy {
    /// Silent no-op: no lookup, no notification, no write.
    #[default]
    Ignore,

    /// Fail with `InvalidAmount` and notify the shopper.
    Reject,
}

impl std::str::FromStr for InvalidAmountPolicy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(InvalidAmountPolicy::Ignore),
            "reject" => Ok(InvalidAmountPolicy::Reject),
            other => Err(StoreError::InvalidConfig(format!(
                "Unknown invalid amount policy: '{}'. Valid options: ignore, reject",
                other
            ))),
        }
    }
}

/// Cart behavior settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSettings {
    #[serde(default)]
    pub invalid_amount: InvalidAmountPolicy,
}

// =============================================================================
// Currency Settings
// =============================================================================

/// Currency used to display prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// ISO 4217 code.
    #[serde(default = "default_currency_code")]
    pub code: String,

    /// Symbol placed before the amount.
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
}

fn default_currency_code() -> String {
    "BRL".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_decimal_separator() -> String {
    ",".to_string()
}

fn default_thousands_separator() -> String {
    ".".to_string()
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: default_currency_code(),
            symbol: default_currency_symbol(),
            decimal_separator: default_decimal_separator(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

impl CurrencySettings {
    /// Formats a price for display.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_cart::config::CurrencySettings;
    /// use storefront_core::Money;
    ///
    /// let brl = CurrencySettings::default();
    /// assert_eq!(brl.format_price(Money::from_cents(123456)), "R$ 1.234,56");
    /// ```
    pub fn format_price(&self, money: Money) -> String {
        let digits = money.major().abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&self.thousands_separator);
            }
            grouped.push(c);
        }

        format!(
            "{}{} {}{}{:02}",
            if money.is_negative() { "-" } else { "" },
            self.symbol,
            grouped,
            self.decimal_separator,
            money.minor()
        )
    }
}

/// Line subtotal rendered for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedLine {
    pub product_id: ProductId,
    pub subtotal: String,
}

/// Cart totals rendered with the configured currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedSummary {
    pub cart_size: usize,
    pub total_amount: i64,
    pub lines: Vec<FormattedLine>,
    pub total: String,
}

impl CurrencySettings {
    /// Renders every money value of a summary for the cart page.
    pub fn format_summary(&self, summary: &CartSummary) -> FormattedSummary {
        FormattedSummary {
            cart_size: summary.cart_size,
            total_amount: summary.total_amount,
            lines: summary
                .lines
                .iter()
                .map(|line| FormattedLine {
                    product_id: line.product_id,
                    subtotal: self.format_price(line.subtotal),
                })
                .collect(),
            total: self.format_price(summary.total),
        }
    }
}

// =============================================================================
// Main Cart Configuration
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub currency: CurrencySettings,
}

impl CartConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads a config file without applying overrides.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StoreError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(StoreError::InvalidUrl(format!(
                "Catalog URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(StoreError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.storage.key.trim().is_empty() {
            return Err(StoreError::InvalidConfig("storage key must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `STOREFRONT_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STOREFRONT_API_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.api.base_url = url;
        }

        if let Some(timeout) = lookup("STOREFRONT_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric catalog timeout"),
            }
        }

        if let Some(mode) = lookup("STOREFRONT_LOOKUP_MODE") {
            match mode.parse() {
                Ok(parsed) => self.api.lookup = parsed,
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(dir) = lookup("STOREFRONT_STORAGE_DIR") {
            debug!(dir = %dir, "Overriding storage directory from environment");
            self.storage.dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = lookup("STOREFRONT_STORAGE_KEY") {
            self.storage.key = key;
        }

        if let Some(policy) = lookup("STOREFRONT_INVALID_AMOUNT") {
            match policy.parse() {
                Ok(parsed) => self.cart.invalid_amount = parsed,
                Err(e) => warn!("{}", e),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "cart")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3333");
        assert_eq!(config.api.lookup, LookupMode::PerItem);
        assert_eq!(config.storage.key, "@RocketShoes:cart");
        assert_eq!(config.cart.invalid_amount, InvalidAmountPolicy::Ignore);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartConfig::default();

        config.api.base_url = "ftp://catalog".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://api.example.com/v1".to_string();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 5;
        config.storage.key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CartConfig = toml::from_str(
            r#"
            [api]
            lookup = "bulk"

            [cart]
            invalid_amount = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.lookup, LookupMode::Bulk);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.cart.invalid_amount, InvalidAmountPolicy::Reject);
        assert_eq!(config.currency.symbol, "R$");
    }

    #[test]
    fn test_toml_serialization() {
        let config = CartConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[storage]"));

        let back: CartConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.storage.key, config.storage.key);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STOREFRONT_API_URL", "https://catalog.example.com"),
            ("STOREFRONT_API_TIMEOUT_SECS", "3"),
            ("STOREFRONT_LOOKUP_MODE", "bulk"),
            ("STOREFRONT_STORAGE_DIR", "/tmp/cart"),
            ("STOREFRONT_INVALID_AMOUNT", "reject"),
        ]
        .into_iter()
        .collect();

        let mut config = CartConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://catalog.example.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(3));
        assert_eq!(config.api.lookup, LookupMode::Bulk);
        assert_eq!(config.storage.dir, Some(PathBuf::from("/tmp/cart")));
        assert_eq!(config.cart.invalid_amount, InvalidAmountPolicy::Reject);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = CartConfig::default();
        config.apply_overrides(|key| match key {
            "STOREFRONT_API_TIMEOUT_SECS" => Some("soon".to_string()),
            "STOREFRONT_LOOKUP_MODE" => Some("sideways".to_string()),
            _ => None,
        });

        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.lookup, LookupMode::PerItem);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("per_item".parse::<LookupMode>().unwrap(), LookupMode::PerItem);
        assert_eq!("BULK".parse::<LookupMode>().unwrap(), LookupMode::Bulk);
        assert!("other".parse::<LookupMode>().is_err());
        assert_eq!(
            "reject".parse::<InvalidAmountPolicy>().unwrap(),
            InvalidAmountPolicy::Reject
        );
    }

    #[test]
    fn test_format_price() {
        let brl = CurrencySettings::default();
        assert_eq!(brl.format_price(Money::from_cents(17990)), "R$ 179,90");
        assert_eq!(brl.format_price(Money::from_cents(0)), "R$ 0,00");
        assert_eq!(brl.format_price(Money::from_cents(100000)), "R$ 1.000,00");
        assert_eq!(brl.format_price(Money::from_cents(123456789)), "R$ 1.234.567,89");
        assert_eq!(brl.format_price(Money::from_cents(-550)), "-R$ 5,50");
    }

    #[test]
    fn test_format_price_usd() {
        let usd = CurrencySettings {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            decimal_separator: ".".to_string(),
            thousands_separator: ",".to_string(),
        };
        assert_eq!(usd.format_price(Money::from_cents(123456)), "$ 1,234.56");
    }

    #[test]
    fn test_format_summary() {
        use storefront_core::{Cart, Product};

        let cart = Cart::new()
            .with_product(Product::new(1, "Tênis", 179.9, "").with_amount(2))
            .unwrap();

        let formatted = CurrencySettings::default().format_summary(&cart.summary());

        assert_eq!(formatted.cart_size, 1);
        assert_eq!(formatted.lines[0].subtotal, "R$ 359,80");
        assert_eq!(formatted.total, "R$ 359,80");
    }

    #[test]
    fn test_resolve_dir_prefers_configured() {
        let settings = StorageSettings {
            dir: Some(PathBuf::from("/srv/cart")),
            key: default_storage_key(),
        };
        assert_eq!(settings.resolve_dir().unwrap(), PathBuf::from("/srv/cart"));
    }
}
