//! Service error taxonomy and its HTTP mapping
//!
//! Three classes of failure reach a client: bad input (400), a misbehaving
//! upstream data provider (502), and everything else (500). Artifact
//! problems never reach a client; they abort startup.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use forecast_engine::EngineError;
use market_data::MarketDataError;
use serde_json::json;
use stock_analytics::AnalyticsError;
use thiserror::Error;
use tracing::{error, warn};

use crate::config::ConfigError;

/// Request-scoped errors, mapped onto HTTP statuses
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client supplied invalid input
    #[error("{0}")]
    BadRequest(String),

    /// An upstream data provider failed us
    #[error("{0}")]
    Upstream(String),

    /// Anything that should not happen with loaded artifacts
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::BadRequest(detail) => warn!(%status, %detail, "request rejected"),
            _ => error!(%status, detail = %self, "request failed"),
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<MarketDataError> for ApiError {
    fn from(err: MarketDataError) -> Self {
        match err {
            MarketDataError::InvalidInterval(_) | MarketDataError::UnknownSymbol(_) => {
                ApiError::BadRequest(err.to_string())
            }
            _ => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ValidationError(_) => ApiError::BadRequest(err.to_string()),
            EngineError::InsufficientHistory { .. } => ApiError::Upstream(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::ValidationError(_) => ApiError::BadRequest(err.to_string()),
            AnalyticsError::DataError(_) => ApiError::Upstream(err.to_string()),
            AnalyticsError::MarketData(inner) => ApiError::from(inner),
        }
    }
}

/// Failures that abort startup; the process does not come up
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Forecast engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
