use reqwest::StatusCode;
use thiserror::Error;

/// Price could not be obtained for this tick
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("exchange error (code {code}): {msg}")]
    Exchange { code: i64, msg: String },

    #[error("malformed price response: {0}")]
    Malformed(String),
}

/// Order was not accepted by the gateway
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("exchange error (code {code}): {msg}")]
    Exchange { code: i64, msg: String },

    #[error("API credentials are not configured")]
    MissingCredentials,

    #[error("malformed order response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("symbol must not be empty")]
    InvalidSymbol,

    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(rust_decimal::Decimal),

    #[error("poll_interval_secs must be at least 1")]
    ZeroPollInterval,

    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}
