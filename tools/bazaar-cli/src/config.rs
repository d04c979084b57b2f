//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bazaar_commerce::checkout::SubmissionConfig;
use bazaar_commerce::pricing::PricingPolicy;
use bazaar_commerce::Currency;
use bazaar_observability::LogFormat;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["bazaar.toml", ".bazaar.toml", "bazaar.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub pricing: PricingPolicy,

    #[serde(default)]
    pub checkout: CheckoutConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// The store currency.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.store.currency)
            .with_context(|| format!("Unknown currency: {}", self.store.currency))
    }

    /// The pricing policy, rejected if it could produce negative charges.
    pub fn pricing_policy(&self) -> Result<PricingPolicy> {
        self.pricing.validate().context("Invalid [pricing] section")?;
        Ok(self.pricing)
    }

    pub fn submission(&self) -> SubmissionConfig {
        SubmissionConfig {
            submit_delay: Duration::from_millis(self.checkout.submit_delay_ms),
            redirect_delay: Duration::from_millis(self.checkout.redirect_delay_ms),
        }
    }

    /// Problems that make the config unusable, then ones worth a warning.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.store.name.trim().is_empty() {
            errors.push("store.name is required".to_string());
        }
        if Currency::from_code(&self.store.currency).is_none() {
            errors.push(format!("store.currency '{}' is not supported", self.store.currency));
        }
        if let Err(e) = self.pricing.validate() {
            errors.push(e.to_string());
        }
        if self.pricing.inside_dhaka_fee > self.pricing.outside_dhaka_fee {
            warnings.push(
                "pricing.inside_dhaka_fee is higher than pricing.outside_dhaka_fee".to_string(),
            );
        }
        if self.checkout.submit_delay_ms > 10_000 || self.checkout.redirect_delay_ms > 10_000 {
            warnings.push("checkout delays over 10s will feel unresponsive".to_string());
        }
        if self.catalog.path.as_os_str().is_empty() {
            errors.push("catalog.path is required".to_string());
        }

        (errors, warnings)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Storefront identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub name: String,

    /// Currency code, e.g. "BDT".
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    Currency::default().code().to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "Bazaar".to_string(),
            currency: default_currency(),
        }
    }
}

/// Order submission timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default = "default_delay_ms")]
    pub submit_delay_ms: u64,

    #[serde(default = "default_delay_ms")]
    pub redirect_delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    2000
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_delay_ms(),
            redirect_delay_ms: default_delay_ms(),
        }
    }
}

/// Where the catalog snapshot lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("catalog.json"),
        }
    }
}

/// Log output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,

    /// `tracing` filter directive; `RUST_LOG` overrides it.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_filter(),
        }
    }
}

/// Session persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".bazaar/sessions"),
        }
    }
}

/// Generate a default bazaar.toml.
pub fn generate_default_config(name: &str) -> String {
    format!(
        r#"# Bazaar storefront configuration

[store]
name = "{name}"
currency = "BDT"

[pricing]
# Share of the price charged up front for preorders
deposit_percent = 20
# Cash-on-delivery charges, in whole taka
inside_dhaka_fee = 60
outside_dhaka_fee = 100

[checkout]
submit_delay_ms = 2000
redirect_delay_ms = 2000

[catalog]
path = "catalog.json"

[logging]
format = "human"
filter = "warn"

[storage]
dir = ".bazaar/sessions"
"#,
        name = name
    )
}
