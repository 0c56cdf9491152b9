// Core modules
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod models;
pub mod strategy;

// Re-export commonly used types
pub use crate::config::{ApiCredentials, Settings, TraderConfig};
pub use error::{ConfigError, FetchError, SubmitError};
pub use execution::{OrderGateway, PriceFeed, ThresholdTrader, TickOutcome};
pub use models::*;
