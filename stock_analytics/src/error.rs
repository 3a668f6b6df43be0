//! Error types for the stock_analytics crate

use market_data::MarketDataError;
use thiserror::Error;

/// Custom error types for the stock_analytics crate
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Error from invalid caller-supplied parameters
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error related to input data
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from the market-data layer
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, AnalyticsError>;
