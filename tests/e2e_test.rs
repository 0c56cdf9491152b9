use mockito::{Matcher, Mock, ServerGuard};
use rust_decimal_macros::dec;
use std::time::Duration;
use thresholdbot::api::BinanceFuturesClient;
use thresholdbot::execution::{PaperGateway, ThresholdTrader, TickOutcome};
use thresholdbot::{ApiCredentials, OrderKind, OrderParams, OrderSide, TraderConfig};

fn client(server: &ServerGuard) -> BinanceFuturesClient {
    BinanceFuturesClient::new(
        server.url(),
        Some(ApiCredentials::new("e2e-key", "e2e-secret")),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn config(kind: OrderKind) -> TraderConfig {
    TraderConfig::new("BTCUSDT", dec!(30000), dec!(31000), dec!(0.01), kind).unwrap()
}

async fn ticker(server: &mut ServerGuard, price: &str) -> Mock {
    server
        .mock("GET", "/fapi/v1/ticker/price")
        .match_query(Matcher::UrlEncoded("symbol".into(), "BTCUSDT".into()))
        .with_status(200)
        .with_body(format!(
            r#"{{"symbol":"BTCUSDT","price":"{}","time":1700000000000}}"#,
            price
        ))
        .create_async()
        .await
}

fn order_ack(side: &str, order_type: &str) -> String {
    format!(
        r#"{{"orderId":7,"symbol":"BTCUSDT","status":"NEW","clientOrderId":"x","price":"0","origQty":"0.01","type":"{}","side":"{}","stopPrice":"0"}}"#,
        order_type, side
    )
}

#[tokio::test]
async fn test_market_round_trip_against_exchange() {
    let _ = tracing_subscriber::fmt::try_init();

    let mut server = mockito::Server::new_async().await;

    let buy = server
        .mock("POST", "/fapi/v1/order")
        .match_header("X-MBX-APIKEY", "e2e-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("side=BUY".into()),
            Matcher::Regex("type=MARKET".into()),
        ]))
        .with_status(200)
        .with_body(order_ack("BUY", "MARKET"))
        .expect(1)
        .create_async()
        .await;
    let sell = server
        .mock("POST", "/fapi/v1/order")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("side=SELL".into()),
            Matcher::Regex("type=MARKET".into()),
        ]))
        .with_status(200)
        .with_body(order_ack("SELL", "MARKET"))
        .expect(1)
        .create_async()
        .await;

    let exchange = client(&server);
    let mut trader = ThresholdTrader::new(config(OrderKind::Market), exchange.clone(), exchange);

    let mut outcomes = Vec::new();
    for price in ["30500", "29900", "29500", "31200"] {
        let mock = ticker(&mut server, price).await;
        outcomes.push(trader.tick().await);
        mock.remove_async().await;
    }

    assert!(matches!(outcomes[0], TickOutcome::Held { .. }));
    assert!(matches!(
        &outcomes[1],
        TickOutcome::Ordered { request, accepted: true, .. } if request.side == OrderSide::Buy
    ));
    assert!(matches!(outcomes[2], TickOutcome::Held { .. }));
    assert!(matches!(
        &outcomes[3],
        TickOutcome::Ordered { request, accepted: true, .. } if request.side == OrderSide::Sell
    ));
    assert!(!trader.state().in_position);

    buy.assert_async().await;
    sell.assert_async().await;
}

#[tokio::test]
async fn test_rejected_stop_limit_buy_still_flips_position() {
    let mut server = mockito::Server::new_async().await;

    let order = server
        .mock("POST", "/fapi/v1/order")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("type=STOP".into()),
            Matcher::Regex("timeInForce=GTC".into()),
            Matcher::Regex("price=29960".into()),
            Matcher::Regex("stopPrice=29950".into()),
        ]))
        .with_status(400)
        .with_body(r#"{"code":-2019,"msg":"Margin is insufficient."}"#)
        .expect(1)
        .create_async()
        .await;

    let exchange = client(&server);
    let mut trader =
        ThresholdTrader::new(config(OrderKind::StopLimit), exchange.clone(), exchange);

    let mock = ticker(&mut server, "29900").await;
    let outcome = trader.tick().await;
    mock.remove_async().await;

    assert!(matches!(outcome, TickOutcome::Ordered { accepted: false, .. }));
    assert!(trader.state().in_position);

    // Still below the buy threshold, but the bot believes it is in position
    let mock = ticker(&mut server, "29000").await;
    assert!(matches!(trader.tick().await, TickOutcome::Held { .. }));
    mock.remove_async().await;

    order.assert_async().await;
}

#[tokio::test]
async fn test_feed_outage_skips_evaluation() {
    let mut server = mockito::Server::new_async().await;

    let outage = server
        .mock("GET", "/fapi/v1/ticker/price")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(2)
        .create_async()
        .await;
    let order = server
        .mock("POST", "/fapi/v1/order")
        .expect(0)
        .create_async()
        .await;

    let exchange = client(&server);
    let mut trader = ThresholdTrader::new(config(OrderKind::Market), exchange.clone(), exchange);

    assert_eq!(trader.tick().await, TickOutcome::FetchFailed);
    assert_eq!(trader.tick().await, TickOutcome::FetchFailed);
    assert!(!trader.state().in_position);

    outage.assert_async().await;
    order.assert_async().await;
}

#[tokio::test]
async fn test_dry_run_uses_live_prices_and_paper_orders() {
    let mut server = mockito::Server::new_async().await;

    let order = server
        .mock("POST", "/fapi/v1/order")
        .expect(0)
        .create_async()
        .await;

    let paper = PaperGateway::new();
    let mut trader =
        ThresholdTrader::new(config(OrderKind::StopLimit), client(&server), paper.clone());

    for price in ["29900", "31200"] {
        let mock = ticker(&mut server, price).await;
        trader.tick().await;
        mock.remove_async().await;
    }

    let submitted = paper.submitted().await;
    assert_eq!(submitted.len(), 2);
    assert!(matches!(
        submitted[1].params,
        OrderParams::Stop { stop_price, limit_price, .. }
            if stop_price == dec!(31150) && limit_price == dec!(31140)
    ));
    assert!(!trader.state().in_position);

    order.assert_async().await;
}
