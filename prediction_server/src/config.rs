//! Service configuration from environment variables

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Default bind address
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
/// Default Twelve Data endpoint
const DEFAULT_TWELVE_DATA_URL: &str = "https://api.twelvedata.com";
/// Default Yahoo endpoint
const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";
/// Default model artifact path
const DEFAULT_MODEL_PATH: &str = "artifacts/lstm_weights.json";
/// Default scaler artifact path
const DEFAULT_SCALER_PATH: &str = "artifacts/scaler.json";

/// Configuration errors surfaced at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Twelve Data API key
    pub twelve_data_api_key: String,
    /// Twelve Data base URL (overridable for tests)
    pub twelve_data_base_url: String,
    /// Yahoo base URL (overridable for tests)
    pub yahoo_base_url: String,
    /// Path to the model weight artifact
    pub model_path: PathBuf,
    /// Path to the scaler artifact
    pub scaler_path: PathBuf,
    /// Optional forecast jitter band; forecasts are deterministic when unset
    pub jitter_band: Option<f64>,
}

impl Config {
    /// Read configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = var_or("PREDICTION_SERVER_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr =
            bind_addr
                .parse()
                .map_err(|_| ConfigError::InvalidVar {
                    name: "PREDICTION_SERVER_ADDR",
                    value: bind_addr.clone(),
                })?;

        let twelve_data_api_key = env::var("TWELVE_DATA_API_KEY")
            .map_err(|_| ConfigError::MissingVar("TWELVE_DATA_API_KEY"))?;

        let jitter_band = match env::var("FORECAST_JITTER_BAND") {
            Ok(value) => Some(value.parse::<f64>().map_err(|_| ConfigError::InvalidVar {
                name: "FORECAST_JITTER_BAND",
                value,
            })?),
            Err(_) => None,
        };

        Ok(Self {
            bind_addr,
            twelve_data_api_key,
            twelve_data_base_url: var_or("TWELVE_DATA_BASE_URL", DEFAULT_TWELVE_DATA_URL),
            yahoo_base_url: var_or("YAHOO_BASE_URL", DEFAULT_YAHOO_URL),
            model_path: PathBuf::from(var_or("MODEL_PATH", DEFAULT_MODEL_PATH)),
            scaler_path: PathBuf::from(var_or("SCALER_PATH", DEFAULT_SCALER_PATH)),
            jitter_band,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
