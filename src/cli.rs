// Command line interface
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::config::{TraderConfig, DEFAULT_SYMBOL};
use crate::error::ConfigError;
use crate::models::OrderKind;

const CREDENTIALS_HELP: &str = "API_KEY and API_SECRET must be set in the environment or .env; \
without them thresholdbot exits at startup unless --dry-run is given.";

#[derive(Parser, Debug)]
#[command(name = "thresholdbot")]
#[command(about = "Simple Binance Futures Trading Bot")]
#[command(version)]
#[command(after_help = CREDENTIALS_HELP)]
pub struct Cli {
    /// Trading pair, e.g. BTCUSDT
    #[arg(long, default_value = DEFAULT_SYMBOL)]
    pub symbol: String,

    /// Buy when the price falls strictly below this value
    #[arg(long = "buy_price", visible_alias = "buy-price")]
    pub buy_price: Decimal,

    /// Sell when the price rises strictly above this value
    #[arg(long = "sell_price", visible_alias = "sell-price")]
    pub sell_price: Decimal,

    /// Order quantity in base asset units
    #[arg(long, default_value = "0.01")]
    pub quantity: Decimal,

    #[arg(
        long = "order_type",
        visible_alias = "order-type",
        value_enum,
        default_value = "MARKET"
    )]
    pub order_type: OrderKind,

    /// Settings file (TOML); missing file falls back to defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log orders instead of sending them to the exchange (no API keys needed)
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn trader_config(&self) -> Result<TraderConfig, ConfigError> {
        TraderConfig::new(
            &self.symbol,
            self.buy_price,
            self.sell_price,
            self.quantity,
            self.order_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let cli =
            Cli::try_parse_from(["thresholdbot", "--buy_price", "30000", "--sell_price", "31000"])
                .unwrap();

        assert_eq!(cli.symbol, "BTCUSDT");
        assert_eq!(cli.quantity, dec!(0.01));
        assert_eq!(cli.order_type, OrderKind::Market);
        assert!(!cli.dry_run);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_thresholds_are_required() {
        assert!(Cli::try_parse_from(["thresholdbot", "--buy_price", "30000"]).is_err());
        assert!(Cli::try_parse_from(["thresholdbot", "--sell_price", "31000"]).is_err());
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "thresholdbot",
            "--symbol",
            "ethusdt",
            "--buy-price",
            "1800.5",
            "--sell-price",
            "1900",
            "--quantity",
            "0.5",
            "--order_type",
            "STOP_LIMIT",
            "--config",
            "bot.toml",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.order_type, OrderKind::StopLimit);
        assert!(cli.dry_run);

        let config = cli.trader_config().unwrap();
        assert_eq!(config.symbol, "ETHUSDT");
        assert_eq!(config.buy_threshold, dec!(1800.5));
        assert_eq!(config.sell_threshold, dec!(1900));
        assert_eq!(config.quantity, dec!(0.5));
    }

    #[test]
    fn test_rejects_unknown_order_type() {
        let result = Cli::try_parse_from([
            "thresholdbot",
            "--buy_price",
            "1",
            "--sell_price",
            "2",
            "--order_type",
            "LIMIT",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_numeric_price() {
        let result =
            Cli::try_parse_from(["thresholdbot", "--buy_price", "cheap", "--sell_price", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_mentions_required_credentials() {
        let help = Cli::command().render_long_help().to_string();

        assert!(help.contains("API_KEY and API_SECRET must be set"));
        assert!(help.contains("exits at startup unless --dry-run"));
    }
}
