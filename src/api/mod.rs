pub mod binance;
pub mod signing;

pub use binance::BinanceFuturesClient;
