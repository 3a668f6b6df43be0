use assert_approx_eq::assert_approx_eq;
use forecast_engine::error::EngineError;
use forecast_engine::forecaster::{Forecast, ForecastOptions, IterativeForecaster};
use forecast_engine::model::SequenceModel;
use forecast_engine::scaler::MinMaxScaler;
use pretty_assertions::assert_eq;

/// Predicts the mean of the window; counts invocations so tests can assert
/// the model is never called on invalid input.
#[derive(Debug)]
struct MeanModel {
    input_len: usize,
    calls: std::sync::atomic::AtomicUsize,
}

impl MeanModel {
    fn new(input_len: usize) -> Self {
        Self {
            input_len,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl SequenceModel for MeanModel {
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn predict_next(&self, window: &[f64]) -> forecast_engine::Result<f64> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(window.iter().sum::<f64>() / window.len() as f64)
    }

    fn name(&self) -> &str {
        "Mean"
    }
}

#[test]
fn forecast_returns_exactly_horizon_values() {
    let model = MeanModel::new(5);
    let forecaster = IterativeForecaster::default();
    let window = vec![0.1, 0.2, 0.3, 0.4, 0.5];

    for horizon in [1, 3, 7, 25] {
        let forecast = forecaster
            .forecast_normalized(&model, &window, horizon)
            .unwrap();
        assert_eq!(forecast.horizon(), horizon);
        assert_eq!(forecast.values().len(), horizon);
    }
}

#[test]
fn forecast_is_deterministic_without_jitter() {
    let model = MeanModel::new(4);
    let forecaster = IterativeForecaster::default();
    let window = vec![0.2, 0.4, 0.6, 0.8];

    let first = forecaster.forecast_normalized(&model, &window, 10).unwrap();
    let second = forecaster.forecast_normalized(&model, &window, 10).unwrap();

    assert_eq!(first.values(), second.values());
}

#[test]
fn window_slides_with_fed_back_predictions() {
    let model = MeanModel::new(2);
    let forecaster = IterativeForecaster::default();

    // window [0, 1]: predictions 0.5, then mean(1, 0.5) = 0.75, then
    // mean(0.5, 0.75) = 0.625
    let forecast = forecaster
        .forecast_normalized(&model, &[0.0, 1.0], 3)
        .unwrap();

    assert_approx_eq!(forecast.values()[0], 0.5);
    assert_approx_eq!(forecast.values()[1], 0.75);
    assert_approx_eq!(forecast.values()[2], 0.625);
}

#[test]
fn zero_horizon_rejected_before_model_invocation() {
    let model = MeanModel::new(3);
    let forecaster = IterativeForecaster::default();

    let result = forecaster.forecast_normalized(&model, &[0.1, 0.2, 0.3], 0);
    assert!(matches!(result, Err(EngineError::ValidationError(_))));
    assert_eq!(model.calls(), 0);
}

#[test]
fn short_history_rejected_before_model_invocation() {
    let model = MeanModel::new(60);
    let forecaster = IterativeForecaster::default();
    let history = vec![0.5; 59];

    let result = forecaster.seed_window(&model, &history);
    match result {
        Err(EngineError::InsufficientHistory { required, actual }) => {
            assert_eq!(required, 60);
            assert_eq!(actual, 59);
        }
        other => panic!("Expected InsufficientHistory, got {:?}", other),
    }
    assert_eq!(model.calls(), 0);
}

#[test]
fn seed_window_takes_newest_observations() {
    let model = MeanModel::new(3);
    let forecaster = IterativeForecaster::default();
    let history = vec![0.1, 0.2, 0.3, 0.4, 0.5];

    let window = forecaster.seed_window(&model, &history).unwrap();
    assert_eq!(window, &[0.3, 0.4, 0.5]);
}

#[test]
fn mismatched_window_length_is_rejected() {
    let model = MeanModel::new(5);
    let forecaster = IterativeForecaster::default();

    let result = forecaster.forecast_normalized(&model, &[0.1, 0.2], 4);
    assert!(matches!(result, Err(EngineError::ValidationError(_))));
    assert_eq!(model.calls(), 0);
}

#[test]
fn forecast_prices_inverse_transforms_every_step() {
    let model = MeanModel::new(3);
    let forecaster = IterativeForecaster::default();
    let scaler = MinMaxScaler::new(100.0, 200.0).unwrap();

    let window = vec![0.5, 0.5, 0.5];
    let forecast = forecaster
        .forecast_prices(&model, &scaler, &window, 4)
        .unwrap();

    for value in forecast.values() {
        assert_approx_eq!(*value, 150.0);
    }
}

#[test]
fn jitter_stays_inside_the_band_and_remains_opt_in() {
    let model = MeanModel::new(4);
    let window = vec![0.5; 4];

    let jittered = IterativeForecaster::new(ForecastOptions {
        jitter_band: Some(0.02),
    })
    .unwrap();

    let forecast = jittered.forecast_normalized(&model, &window, 50).unwrap();
    // First prediction is 0.5 scaled by a factor in [0.98, 1.02]; later steps
    // compound, so only the first step is bounded tightly.
    let first = forecast.values()[0];
    assert!(first >= 0.5 * 0.98 && first <= 0.5 * 1.02);

    // Default options leave the model output untouched
    let plain = IterativeForecaster::default()
        .forecast_normalized(&model, &window, 1)
        .unwrap();
    assert_approx_eq!(plain.values()[0], 0.5);
}

#[test]
fn invalid_jitter_band_is_rejected() {
    for band in [0.0, -0.5, 1.0, f64::NAN] {
        let result = IterativeForecaster::new(ForecastOptions {
            jitter_band: Some(band),
        });
        assert!(result.is_err());
    }
}

#[test]
fn forecast_result_validates_length() {
    assert!(Forecast::new(vec![1.0, 2.0], 3).is_err());
    assert!(Forecast::new(vec![1.0, 2.0, 3.0], 3).is_ok());
}
