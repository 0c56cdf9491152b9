// Trader and runtime configuration
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::OrderKind;

pub const DEFAULT_SYMBOL: &str = "BTCUSDT";
pub const DEFAULT_SETTINGS_FILE: &str = "thresholdbot.toml";
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

const ENV_PREFIX: &str = "BOT";

/// Distance of stop and limit prices from the triggering price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopOffsets {
    pub stop: Decimal,
    pub limit: Decimal,
}

impl Default for StopOffsets {
    fn default() -> Self {
        Self {
            stop: dec!(50),
            limit: dec!(60),
        }
    }
}

/// Immutable trading parameters for one bot run
#[derive(Debug, Clone, PartialEq)]
pub struct TraderConfig {
    pub symbol: String,
    pub buy_threshold: Decimal,
    pub sell_threshold: Decimal,
    pub quantity: Decimal,
    pub order_kind: OrderKind,
    pub offsets: StopOffsets,
}

impl TraderConfig {
    pub fn new(
        symbol: &str,
        buy_threshold: Decimal,
        sell_threshold: Decimal,
        quantity: Decimal,
        order_kind: OrderKind,
    ) -> Result<Self, ConfigError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ConfigError::InvalidSymbol);
        }
        if quantity <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveQuantity(quantity));
        }

        if buy_threshold > sell_threshold {
            tracing::warn!(
                buy = %buy_threshold,
                sell = %sell_threshold,
                "Buy threshold is above sell threshold; BUY takes precedence when both match"
            );
        }

        Ok(Self {
            symbol,
            buy_threshold,
            sell_threshold,
            quantity,
            order_kind,
            offsets: StopOffsets::default(),
        })
    }

    pub fn with_offsets(mut self, offsets: StopOffsets) -> Self {
        self.offsets = offsets;
        self
    }
}

/// Runtime and exchange settings
///
/// Layered as: defaults, then an optional TOML file, then `BOT_*` environment
/// variables (e.g. `BOT_POLL_INTERVAL_SECS=5`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub recv_window_ms: u64,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub log_file: PathBuf,
    pub stop_offset: Decimal,
    pub limit_offset: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        let offsets = StopOffsets::default();
        Self {
            base_url: TESTNET_BASE_URL.to_string(),
            recv_window_ms: 5000,
            request_timeout_secs: 10,
            poll_interval_secs: 3,
            log_file: PathBuf::from("trading_bot.log"),
            stop_offset: offsets.stop,
            limit_offset: offsets.limit,
        }
    }
}

impl Settings {
    /// Load settings; a missing file is not an error
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

        let settings: Settings = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("recv_window_ms", defaults.recv_window_ms)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("poll_interval_secs", defaults.poll_interval_secs)?
            .set_default("log_file", defaults.log_file.to_string_lossy().to_string())?
            .set_default("stop_offset", defaults.stop_offset.to_string())?
            .set_default("limit_offset", defaults.limit_offset.to_string())?
            .add_source(config::File::from(file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        Ok(settings)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn offsets(&self) -> StopOffsets {
        StopOffsets {
            stop: self.stop_offset,
            limit: self.limit_offset,
        }
    }
}

/// Exchange API key pair, passed through to the exchange client untouched
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Read `API_KEY` / `API_SECRET`; returns None unless both are set
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("API_KEY").ok().filter(|v| !v.is_empty())?;
        let api_secret = std::env::var("API_SECRET").ok().filter(|v| !v.is_empty())?;
        Some(Self::new(api_key, api_secret))
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
