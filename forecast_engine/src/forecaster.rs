//! Iterative multi-step forecasting
//!
//! The model only ever predicts one step ahead. A longer horizon is produced
//! by feeding each prediction back in as the newest observation and sliding
//! the window forward, one step at a time.

use crate::error::{EngineError, Result};
use crate::model::SequenceModel;
use crate::scaler::MinMaxScaler;
use rand::Rng;
use rand_distr::Uniform;

/// Options controlling the forecast loop.
///
/// Forecasts are deterministic by default: the same window and the same model
/// produce the same sequence. The optional multiplicative jitter perturbs
/// each prediction before it is recorded and fed back; it stays off unless
/// explicitly configured.
#[derive(Debug, Clone, Default)]
pub struct ForecastOptions {
    /// Half-width of the uniform jitter band around 1.0, e.g. `0.02` for
    /// +/-2%. `None` disables jitter.
    pub jitter_band: Option<f64>,
}

impl ForecastOptions {
    /// Validate option values
    pub fn validate(&self) -> Result<()> {
        if let Some(band) = self.jitter_band {
            if !band.is_finite() || band <= 0.0 || band >= 1.0 {
                return Err(EngineError::ValidationError(format!(
                    "jitter band must be in (0, 1), got {}",
                    band
                )));
            }
        }
        Ok(())
    }
}

/// Forecasted price sequence
#[derive(Debug, Clone)]
pub struct Forecast {
    /// Forecasted values, one per future step
    values: Vec<f64>,
    /// Number of periods forecasted
    horizon: usize,
}

impl Forecast {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizon: usize) -> Result<Self> {
        if values.len() != horizon {
            return Err(EngineError::ValidationError(format!(
                "Values length ({}) doesn't match horizon ({})",
                values.len(),
                horizon
            )));
        }

        Ok(Self { values, horizon })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.horizon
    }
}

/// Iterative forecaster over any [`SequenceModel`]
#[derive(Debug, Clone, Default)]
pub struct IterativeForecaster {
    options: ForecastOptions,
}

impl IterativeForecaster {
    /// Create a forecaster with the given options
    pub fn new(options: ForecastOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Extract the model's seed window from observed (normalized) history.
    ///
    /// Fails before any model invocation when fewer than `input_len()`
    /// observations are available.
    pub fn seed_window<'a>(
        &self,
        model: &dyn SequenceModel,
        history: &'a [f64],
    ) -> Result<&'a [f64]> {
        let required = model.input_len();
        if history.len() < required {
            return Err(EngineError::InsufficientHistory {
                required,
                actual: history.len(),
            });
        }
        Ok(&history[history.len() - required..])
    }

    /// Forecast `horizon` normalized values from a window of `input_len()`
    /// normalized observations.
    pub fn forecast_normalized(
        &self,
        model: &dyn SequenceModel,
        window: &[f64],
        horizon: usize,
    ) -> Result<Forecast> {
        if horizon == 0 {
            return Err(EngineError::ValidationError(
                "Forecast horizon must be positive".to_string(),
            ));
        }
        if window.len() != model.input_len() {
            return Err(EngineError::ValidationError(format!(
                "Window length ({}) doesn't match model input length ({})",
                window.len(),
                model.input_len()
            )));
        }

        let mut current = window.to_vec();
        let mut predictions = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let mut predicted = model.predict_next(&current)?;
            if let Some(band) = self.options.jitter_band {
                predicted *= jitter_factor(band);
            }

            predictions.push(predicted);

            // Slide the window: drop the oldest value, append the prediction
            current.remove(0);
            current.push(predicted);
        }

        Forecast::new(predictions, horizon)
    }

    /// Forecast `horizon` prices: run the normalized loop, then map every
    /// prediction back to price scale with the scaler that produced the
    /// window (not re-fit).
    pub fn forecast_prices(
        &self,
        model: &dyn SequenceModel,
        scaler: &MinMaxScaler,
        window: &[f64],
        horizon: usize,
    ) -> Result<Forecast> {
        let normalized = self.forecast_normalized(model, window, horizon)?;
        Forecast::new(
            scaler.inverse_transform_all(normalized.values()),
            horizon,
        )
    }
}

fn jitter_factor(band: f64) -> f64 {
    let mut rng = rand::thread_rng();
    rng.sample(Uniform::new(1.0 - band, 1.0 + band))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal model for loop tests: always predicts the same value
    #[derive(Debug)]
    struct ConstantModel {
        value: f64,
        input_len: usize,
    }

    impl SequenceModel for ConstantModel {
        fn input_len(&self) -> usize {
            self.input_len
        }

        fn predict_next(&self, _window: &[f64]) -> Result<f64> {
            Ok(self.value)
        }

        fn name(&self) -> &str {
            "Constant"
        }
    }

    #[test]
    fn constant_model_yields_constant_forecast() {
        let model = ConstantModel {
            value: 0.5,
            input_len: 60,
        };
        let forecaster = IterativeForecaster::default();

        let window = vec![0.5; 60];
        let forecast = forecaster.forecast_normalized(&model, &window, 3).unwrap();

        assert_eq!(forecast.values(), &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let model = ConstantModel {
            value: 0.5,
            input_len: 4,
        };
        let forecaster = IterativeForecaster::default();

        let result = forecaster.forecast_normalized(&model, &[0.1, 0.2, 0.3, 0.4], 0);
        assert!(matches!(result, Err(EngineError::ValidationError(_))));
    }
}
