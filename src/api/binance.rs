use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use super::signing;
use crate::config::{ApiCredentials, Settings};
use crate::error::{FetchError, SubmitError};
use crate::execution::{OrderGateway, PriceFeed};
use crate::models::{OrderConfirmation, OrderParams, OrderRequest, PriceQuote};

const TICKER_PRICE_PATH: &str = "/fapi/v1/ticker/price";
const ORDER_PATH: &str = "/fapi/v1/order";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const DEFAULT_RECV_WINDOW_MS: u64 = 5000;

/// Client for the Binance USD-M futures REST API
#[derive(Clone)]
pub struct BinanceFuturesClient {
    client: Client,
    base_url: String,
    credentials: Option<ApiCredentials>,
    recv_window_ms: u64,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    symbol: String,
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

impl BinanceFuturesClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<ApiCredentials>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
        })
    }

    pub fn from_settings(
        settings: &Settings,
        credentials: Option<ApiCredentials>,
    ) -> Result<Self, reqwest::Error> {
        Ok(
            Self::new(&settings.base_url, credentials, settings.request_timeout())?
                .with_recv_window(settings.recv_window_ms),
        )
    }

    pub fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the url-encoded, signed form body for a new order
    fn signed_order_payload(
        request: &OrderRequest,
        recv_window_ms: u64,
        timestamp_ms: i64,
        secret: &str,
    ) -> String {
        let mut params: Vec<(&str, String)> = vec![
            ("symbol", request.symbol.clone()),
            ("side", request.side.as_str().to_string()),
            ("type", request.order_type().as_str().to_string()),
            ("quantity", request.quantity.normalize().to_string()),
            ("newClientOrderId", request.client_order_id.clone()),
        ];

        if let OrderParams::Stop {
            stop_price,
            limit_price,
            time_in_force,
        } = &request.params
        {
            params.push(("timeInForce", time_in_force.as_str().to_string()));
            params.push(("price", limit_price.normalize().to_string()));
            params.push(("stopPrice", stop_price.normalize().to_string()));
        }

        params.push(("recvWindow", recv_window_ms.to_string()));
        params.push(("timestamp", timestamp_ms.to_string()));

        let payload = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let signature = signing::sign(secret, &payload);

        format!("{}&signature={}", payload, signature)
    }

    fn parse_api_error(body: &str) -> Option<ApiErrorBody> {
        serde_json::from_str(body).ok()
    }
}

#[async_trait]
impl PriceFeed for BinanceFuturesClient {
    async fn get_price(&self, symbol: &str) -> Result<PriceQuote, FetchError> {
        let url = format!("{}{}", self.base_url, TICKER_PRICE_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match Self::parse_api_error(&body) {
                Some(err) => FetchError::Exchange {
                    code: err.code,
                    msg: err.msg,
                },
                None => FetchError::Status { status, body },
            });
        }

        let ticker: TickerPrice =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        Ok(PriceQuote {
            symbol: ticker.symbol,
            price: ticker.price,
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl OrderGateway for BinanceFuturesClient {
    async fn submit_order(
        &self,
        request: &OrderRequest,
    ) -> Result<OrderConfirmation, SubmitError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(SubmitError::MissingCredentials)?;

        let url = format!("{}{}", self.base_url, ORDER_PATH);
        let payload = Self::signed_order_payload(
            request,
            self.recv_window_ms,
            Utc::now().timestamp_millis(),
            &credentials.api_secret,
        );

        tracing::debug!(
            symbol = %request.symbol,
            side = %request.side,
            order_type = request.order_type().as_str(),
            client_order_id = %request.client_order_id,
            "Submitting order"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &credentials.api_key)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match Self::parse_api_error(&body) {
                Some(err) => SubmitError::Exchange {
                    code: err.code,
                    msg: err.msg,
                },
                None => SubmitError::Status { status, body },
            });
        }

        serde_json::from_str(&body).map_err(|e| SubmitError::Malformed(e.to_string()))
    }
}
