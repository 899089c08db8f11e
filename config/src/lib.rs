//! Configuration file for Till.
//!
//! ```toml
//! [app]
//! fps = 60
//! high_contrast = false
//! ascii_only = false
//!
//! [verify]
//! policy = "fifty_fifty"
//! price = 1.25
//! payment = 5.00
//!
//! [wallet]
//! max_time_sec = 120
//! max_attempts = 3
//! items = [{ name = "Tomato sauce", price = 0.45 }]
//!
//! [assets]
//! dir = "/path/to/assets"
//! ```
//!
//! Every section is optional. Values are validated when they are turned into
//! task settings, not at parse time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use till_core::{AssetCatalog, AssetError};
use till_engine::{DEFAULT_FPS, ReceiptItem, VerifySettings, WalletSettings};
use till_types::{Cents, ChangePolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Assets(#[from] AssetError),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TillConfig {
    pub app: Option<AppConfig>,
    pub verify: Option<VerifyConfig>,
    pub wallet: Option<WalletConfig>,
    pub assets: Option<AssetsConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    pub fps: Option<u32>,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Use ASCII-only glyphs for borders and markers.
    #[serde(default)]
    pub ascii_only: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyConfig {
    pub policy: Option<ChangePolicy>,
    pub price: Option<f64>,
    pub payment: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WalletConfig {
    pub max_time_sec: Option<u64>,
    pub max_attempts: Option<u32>,
    pub items: Option<Vec<ItemConfig>>,
    /// Keep the receipt in file order.
    #[serde(default)]
    pub fixed_order: bool,
}

#[derive(Debug, Deserialize)]
pub struct ItemConfig {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetsConfig {
    pub dir: Option<PathBuf>,
}

impl TillConfig {
    /// Load `~/.till/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    pub fn fps(&self) -> Result<u32, ConfigError> {
        match self.app.as_ref().and_then(|app| app.fps) {
            Some(0) => Err(ConfigError::invalid("app.fps", "must be greater than zero")),
            Some(fps) => Ok(fps),
            None => Ok(DEFAULT_FPS),
        }
    }

    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.high_contrast)
    }

    #[must_use]
    pub fn ascii_only(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.ascii_only)
    }

    pub fn verify_settings(&self) -> Result<VerifySettings, ConfigError> {
        let mut settings = VerifySettings::default();
        let Some(verify) = self.verify.as_ref() else {
            return Ok(settings);
        };
        if let Some(policy) = verify.policy {
            settings.policy = policy;
        }
        if let Some(price) = verify.price {
            settings.price = whole_cents("verify.price", price)?;
        }
        if let Some(payment) = verify.payment {
            settings.payment = whole_cents("verify.payment", payment)?;
        }
        if settings.payment.is_zero() {
            return Err(ConfigError::invalid("verify.payment", "must be greater than zero"));
        }
        if settings.payment < settings.price {
            return Err(ConfigError::invalid(
                "verify.payment",
                format!(
                    "{} does not cover the price {}",
                    settings.payment, settings.price
                ),
            ));
        }
        Ok(settings)
    }

    pub fn wallet_settings(&self) -> Result<WalletSettings, ConfigError> {
        let mut settings = WalletSettings::default();
        let Some(wallet) = self.wallet.as_ref() else {
            return Ok(settings);
        };
        if let Some(secs) = wallet.max_time_sec {
            if secs == 0 {
                return Err(ConfigError::invalid(
                    "wallet.max_time_sec",
                    "must be greater than zero",
                ));
            }
            settings.max_time = Duration::from_secs(secs);
        }
        if let Some(attempts) = wallet.max_attempts {
            if attempts == 0 {
                return Err(ConfigError::invalid("wallet.max_attempts", "must be at least 1"));
            }
            settings.max_attempts = attempts;
        }
        if let Some(items) = wallet.items.as_ref() {
            if items.is_empty() {
                return Err(ConfigError::invalid("wallet.items", "receipt has no items"));
            }
            settings.items = items
                .iter()
                .map(|item| Ok(ReceiptItem::new(item.name.clone(), whole_cents("wallet.items.price", item.price)?)))
                .collect::<Result<_, ConfigError>>()?;
        }
        settings.shuffle_items = !wallet.fixed_order;
        Ok(settings)
    }

    /// Asset table, bound to the configured directory if there is one.
    pub fn catalog(&self) -> Result<AssetCatalog, ConfigError> {
        let catalog = AssetCatalog::builtin();
        match self.assets.as_ref().and_then(|assets| assets.dir.as_ref()) {
            Some(dir) => Ok(catalog.with_dir(dir)?),
            None => Ok(catalog),
        }
    }
}

/// Reject negative, non-finite and sub-cent amounts.
fn whole_cents(field: &'static str, dollars: f64) -> Result<Cents, ConfigError> {
    if !dollars.is_finite() || dollars < 0.0 {
        return Err(ConfigError::invalid(field, format!("{dollars} is not a valid amount")));
    }
    let cents = Cents::from_dollars(dollars);
    if (dollars * 100.0 - cents.as_i64() as f64).abs() > 1e-6 {
        return Err(ConfigError::invalid(field, format!("{dollars} is not a whole number of cents")));
    }
    Ok(cents)
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".till").join("config.toml"))
}
