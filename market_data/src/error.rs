//! Error types for the market_data crate

use thiserror::Error;

/// Custom error types for the market_data crate
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// Transport-level failure talking to a vendor
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Vendor answered with a non-success status or an error payload
    #[error("Vendor error: {0}")]
    VendorError(String),

    /// Vendor rejected the requested symbol
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Vendor payload was missing an expected field or held an unparsable value
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Unknown sampling interval string
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// Error related to series validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, MarketDataError>;

impl From<polars::prelude::PolarsError> for MarketDataError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        MarketDataError::PolarsError(err.to_string())
    }
}
