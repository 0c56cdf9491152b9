use rust_decimal::Decimal;

use crate::config::TraderConfig;
use crate::models::{OrderKind, OrderRequest, OrderSide};

/// Local belief about whether the bot holds a position
///
/// Starts FLAT on every process start and is never reconciled with the exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraderState {
    pub in_position: bool,
}

impl TraderState {
    pub fn flat() -> Self {
        Self { in_position: false }
    }

    pub fn in_position() -> Self {
        Self { in_position: true }
    }
}

/// Evaluate one price observation against the thresholds
///
/// FLAT -> IN_POSITION when `price < buy_threshold` (BUY),
/// IN_POSITION -> FLAT when `price > sell_threshold` (SELL).
/// Both comparisons are strict and the BUY branch is checked first.
pub fn decide(
    state: TraderState,
    price: Decimal,
    config: &TraderConfig,
) -> (TraderState, Option<OrderRequest>) {
    if !state.in_position && price < config.buy_threshold {
        let order = build_order(config, OrderSide::Buy, price);
        return (TraderState::in_position(), Some(order));
    }

    if state.in_position && price > config.sell_threshold {
        let order = build_order(config, OrderSide::Sell, price);
        return (TraderState::flat(), Some(order));
    }

    (state, None)
}

fn build_order(config: &TraderConfig, side: OrderSide, price: Decimal) -> OrderRequest {
    match config.order_kind {
        OrderKind::Market => OrderRequest::market(&config.symbol, side, config.quantity),
        OrderKind::StopLimit => {
            let offsets = config.offsets;
            let (stop_price, limit_price) = match side {
                OrderSide::Buy => (price + offsets.stop, price + offsets.limit),
                OrderSide::Sell => (price - offsets.stop, price - offsets.limit),
            };
            OrderRequest::stop_limit(&config.symbol, side, config.quantity, stop_price, limit_price)
        }
    }
}
