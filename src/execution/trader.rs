use rust_decimal::Decimal;
use tokio::time::{sleep, Duration};

use super::{OrderGateway, PriceFeed};
use crate::config::TraderConfig;
use crate::models::{OrderRequest, OrderSide};
use crate::strategy::{decide, TraderState};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Result of a single polling iteration
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Price could not be fetched; thresholds were not evaluated
    FetchFailed,
    /// Price observed, no threshold crossed
    Held { price: Decimal },
    /// An order was submitted; `accepted` reports whether the gateway confirmed it
    Ordered {
        price: Decimal,
        request: OrderRequest,
        accepted: bool,
    },
}

/// Polls a price feed and trades a single symbol on threshold crossings
pub struct ThresholdTrader<F, G> {
    config: TraderConfig,
    state: TraderState,
    feed: F,
    gateway: G,
    poll_interval: Duration,
}

impl<F: PriceFeed, G: OrderGateway> ThresholdTrader<F, G> {
    pub fn new(config: TraderConfig, feed: F, gateway: G) -> Self {
        Self {
            config,
            state: TraderState::default(),
            feed,
            gateway,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn state(&self) -> TraderState {
        self.state
    }

    /// Run one iteration: fetch, decide, and submit at most one order
    pub async fn tick(&mut self) -> TickOutcome {
        let quote = match self.feed.get_price(&self.config.symbol).await {
            Ok(quote) => quote,
            Err(e) => {
                tracing::error!("Error fetching price: {}", e);
                return TickOutcome::FetchFailed;
            }
        };
        let price = quote.price;

        tracing::info!("Current price of {}: {}", self.config.symbol, price);

        let (next_state, order) = decide(self.state, price, &self.config);
        let Some(request) = order else {
            return TickOutcome::Held { price };
        };

        match request.side {
            OrderSide::Buy => tracing::info!(
                "Price is below {}. Preparing to BUY...",
                self.config.buy_threshold
            ),
            OrderSide::Sell => tracing::info!(
                "Price is above {}. Preparing to SELL...",
                self.config.sell_threshold
            ),
        }

        let accepted = match self.gateway.submit_order(&request).await {
            Ok(confirmation) => {
                tracing::info!(
                    client_order_id = %request.client_order_id,
                    "{} {} order placed: {:?}",
                    request.side,
                    request.kind(),
                    confirmation
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    client_order_id = %request.client_order_id,
                    "Error placing {} {} order: {}",
                    request.kind(),
                    request.side,
                    e
                );
                false
            }
        };

        // The position flag follows the decision whether or not the order went through
        self.state = next_state;

        TickOutcome::Ordered {
            price,
            request,
            accepted,
        }
    }

    /// Poll forever; only process termination stops the loop
    pub async fn run(&mut self) {
        tracing::info!(
            symbol = %self.config.symbol,
            buy_below = %self.config.buy_threshold,
            sell_above = %self.config.sell_threshold,
            quantity = %self.config.quantity,
            order_type = %self.config.order_kind,
            interval = ?self.poll_interval,
            "Threshold trader starting"
        );

        loop {
            self.tick().await;
            sleep(self.poll_interval).await;
        }
    }
}
