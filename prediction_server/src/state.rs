//! Shared read-only service state
//!
//! Model and scaler are loaded once at startup and never mutated, so every
//! request can share them without locking.

use crate::config::Config;
use crate::error::StartupError;
use forecast_engine::{ForecastOptions, IterativeForecaster, LstmModel, MinMaxScaler, SequenceModel};
use market_data::{TwelveDataClient, YahooClient};
use tracing::info;

/// Everything a request handler needs, behind one `Arc`
#[derive(Debug)]
pub struct AppState {
    pub model: LstmModel,
    pub scaler: MinMaxScaler,
    pub forecaster: IterativeForecaster,
    pub twelve_data: TwelveDataClient,
    pub yahoo: YahooClient,
}

impl AppState {
    /// Load artifacts and build vendor clients. Any artifact failure here is
    /// fatal: the service refuses to start without a usable model.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let model = LstmModel::from_path(&config.model_path)?;
        let scaler = MinMaxScaler::from_path(&config.scaler_path)?;
        info!(
            model = model.name(),
            window = model.input_len(),
            "artifacts loaded"
        );

        let forecaster = IterativeForecaster::new(ForecastOptions {
            jitter_band: config.jitter_band,
        })?;
        if config.jitter_band.is_some() {
            info!(band = ?config.jitter_band, "forecast jitter enabled");
        }

        let twelve_data = TwelveDataClient::new(
            config.twelve_data_base_url.clone(),
            config.twelve_data_api_key.clone(),
        )?;
        let yahoo = YahooClient::new(config.yahoo_base_url.clone())?;

        Ok(Self {
            model,
            scaler,
            forecaster,
            twelve_data,
            yahoo,
        })
    }
}
