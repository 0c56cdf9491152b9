// Price polling, order submission and the trading loop
pub mod paper;
pub mod trader;

pub use paper::PaperGateway;
pub use trader::{ThresholdTrader, TickOutcome};

use async_trait::async_trait;

use crate::error::{FetchError, SubmitError};
use crate::models::{OrderConfirmation, OrderRequest, PriceQuote};

/// Source of the latest market price
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn get_price(&self, symbol: &str) -> Result<PriceQuote, FetchError>;
}

/// Destination for orders
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit_order(&self, request: &OrderRequest)
        -> Result<OrderConfirmation, SubmitError>;
}
