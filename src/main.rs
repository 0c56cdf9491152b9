use anyhow::Context;
use clap::Parser;
use thresholdbot::api::BinanceFuturesClient;
use thresholdbot::cli::Cli;
use thresholdbot::execution::{OrderGateway, PaperGateway, PriceFeed, ThresholdTrader};
use thresholdbot::logging::init_logging;
use thresholdbot::{ApiCredentials, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let _log_guard = init_logging(&settings.log_file);

    let trader_config = cli
        .trader_config()
        .context("Invalid trading parameters")?
        .with_offsets(settings.offsets());

    let credentials = ApiCredentials::from_env();
    if credentials.is_none() && !cli.dry_run {
        anyhow::bail!("API_KEY and API_SECRET must be set (or pass --dry-run)");
    }

    tracing::info!("🚀 thresholdbot starting");
    tracing::info!("  Exchange: {}", settings.base_url);
    tracing::info!("  Log file: {}", settings.log_file.display());
    if cli.dry_run {
        tracing::info!("  Mode: dry run (orders are not sent)");
    }

    let client = BinanceFuturesClient::from_settings(&settings, credentials)
        .context("Failed to build HTTP client")?;

    if cli.dry_run {
        let trader = ThresholdTrader::new(trader_config, client, PaperGateway::new())
            .with_poll_interval(settings.poll_interval());
        run_until_interrupted(trader).await;
    } else {
        let trader = ThresholdTrader::new(trader_config, client.clone(), client)
            .with_poll_interval(settings.poll_interval());
        run_until_interrupted(trader).await;
    }

    tracing::info!("👋 thresholdbot stopped");
    Ok(())
}

/// Run the trader until Ctrl+C; in-flight work is dropped
async fn run_until_interrupted<F: PriceFeed, G: OrderGateway>(mut trader: ThresholdTrader<F, G>) {
    tokio::select! {
        _ = trader.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("⚠️  Received Ctrl+C, shutting down...");
        }
    }
}
