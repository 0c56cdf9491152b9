use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Order direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order style the bot is configured to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OrderKind {
    #[value(name = "MARKET")]
    Market,
    #[value(name = "STOP_LIMIT")]
    StopLimit,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => f.write_str("MARKET"),
            OrderKind::StopLimit => f.write_str("STOP-LIMIT"),
        }
    }
}

/// Order type as sent to the exchange
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Stop,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Stop => "STOP",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    Gtc,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
        }
    }
}

/// Type-specific order parameters
#[derive(Debug, Clone, PartialEq)]
pub enum OrderParams {
    Market,
    Stop {
        stop_price: Decimal,
        limit_price: Decimal,
        time_in_force: TimeInForce,
    },
}

/// A single order produced by the trader and consumed by an order gateway
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub params: OrderParams,
    pub client_order_id: String,
}

impl OrderRequest {
    pub fn market(symbol: &str, side: OrderSide, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            quantity,
            params: OrderParams::Market,
            client_order_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn stop_limit(
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            quantity,
            params: OrderParams::Stop {
                stop_price,
                limit_price,
                time_in_force: TimeInForce::Gtc,
            },
            client_order_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn order_type(&self) -> OrderType {
        match self.params {
            OrderParams::Market => OrderType::Market,
            OrderParams::Stop { .. } => OrderType::Stop,
        }
    }

    /// Label used in log lines ("MARKET" / "STOP-LIMIT")
    pub fn kind(&self) -> OrderKind {
        match self.params {
            OrderParams::Market => OrderKind::Market,
            OrderParams::Stop { .. } => OrderKind::StopLimit,
        }
    }
}

/// Latest price for a symbol, valid for a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: Decimal,
    pub fetched_at: DateTime<Utc>,
}

/// Exchange acknowledgement of a submitted order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: u64,
    pub client_order_id: String,
    pub symbol: String,
    pub status: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub orig_qty: Decimal,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
}
