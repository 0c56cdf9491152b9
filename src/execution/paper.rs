// Dry-run order gateway
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::OrderGateway;
use crate::error::SubmitError;
use crate::models::{OrderConfirmation, OrderParams, OrderRequest};

/// Number of accepted orders kept for inspection
const HISTORY_LIMIT: usize = 100;

/// Accepts every order without contacting the exchange
#[derive(Clone, Default)]
pub struct PaperGateway {
    next_order_id: Arc<AtomicU64>,
    submitted: Arc<RwLock<VecDeque<OrderRequest>>>,
}

impl PaperGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent accepted orders (at most `HISTORY_LIMIT`), oldest first
    pub async fn submitted(&self) -> Vec<OrderRequest> {
        self.submitted.read().await.iter().cloned().collect()
    }
}

#[async_trait]
impl OrderGateway for PaperGateway {
    async fn submit_order(
        &self,
        request: &OrderRequest,
    ) -> Result<OrderConfirmation, SubmitError> {
        let order_id = self.next_order_id.fetch_add(1, Ordering::Relaxed) + 1;

        let (price, stop_price) = match request.params {
            OrderParams::Market => (None, None),
            OrderParams::Stop {
                stop_price,
                limit_price,
                ..
            } => (Some(limit_price), Some(stop_price)),
        };

        {
            let mut history = self.submitted.write().await;
            if history.len() == HISTORY_LIMIT {
                history.pop_front();
            }
            history.push_back(request.clone());
        }

        tracing::info!(order_id, side = %request.side, "Paper order accepted");

        Ok(OrderConfirmation {
            order_id,
            client_order_id: request.client_order_id.clone(),
            symbol: request.symbol.clone(),
            status: "NEW".to_string(),
            side: request.side,
            order_type: request.order_type(),
            orig_qty: request.quantity,
            price,
            stop_price,
        })
    }
}
