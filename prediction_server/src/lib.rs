//! # Prediction Server
//!
//! HTTP service tying the layers together: it loads the model and scaler
//! artifacts at startup, then serves forecasts, raw series, association
//! rules and financial analysis over JSON endpoints.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use crate::config::Config;
pub use crate::error::{ApiError, StartupError};
pub use crate::routes::router;
pub use crate::state::AppState;
