//! # Forecast Engine
//!
//! Sequence-model inference and iterative multi-step price forecasting.
//!
//! The crate owns the one genuinely algorithmic piece of the service: given a
//! trained point-forecast model (a fixed-length window of normalized values
//! in, one normalized value out) and a seed window, it extrapolates an
//! arbitrary horizon by feeding each prediction back in as the newest
//! observation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_engine::{ForecastOptions, IterativeForecaster, LstmModel, MinMaxScaler};
//!
//! # fn main() -> forecast_engine::Result<()> {
//! // Artifacts produced by the external training pipeline
//! let model = LstmModel::from_path("artifacts/lstm_weights.json")?;
//! let scaler = MinMaxScaler::from_path("artifacts/scaler.json")?;
//!
//! let forecaster = IterativeForecaster::new(ForecastOptions::default())?;
//!
//! // Normalized close prices, oldest first
//! let history: Vec<f64> = vec![0.5; 120];
//! let window = forecaster.seed_window(&model, &history)?;
//! let forecast = forecaster.forecast_prices(&model, &scaler, window, 10)?;
//! assert_eq!(forecast.horizon(), 10);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod forecaster;
pub mod model;
pub mod scaler;

// Re-export commonly used types
pub use crate::error::{EngineError, Result};
pub use crate::forecaster::{Forecast, ForecastOptions, IterativeForecaster};
pub use crate::model::{LstmModel, NetworkWeights, SequenceModel};
pub use crate::scaler::MinMaxScaler;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
