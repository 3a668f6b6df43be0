use assert_approx_eq::assert_approx_eq;
use forecast_engine::error::EngineError;
use forecast_engine::scaler::MinMaxScaler;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn round_trip_recovers_original_values() {
    let scaler = MinMaxScaler::new(37.25, 412.8).unwrap();

    for value in [37.25, 50.0, 100.0, 265.99, 412.8] {
        let there_and_back = scaler.inverse_transform(scaler.transform(value));
        assert_approx_eq!(there_and_back, value, 1e-9);
    }
}

#[test]
fn round_trip_holds_for_custom_ranges() {
    let scaler = MinMaxScaler::with_range(10.0, 20.0, -1.0, 1.0).unwrap();

    assert_approx_eq!(scaler.transform(10.0), -1.0);
    assert_approx_eq!(scaler.transform(20.0), 1.0);
    assert_approx_eq!(scaler.inverse_transform(0.0), 15.0);
}

#[test]
fn transform_all_maps_every_value() {
    let scaler = MinMaxScaler::new(0.0, 100.0).unwrap();
    let normalized = scaler.transform_all(&[0.0, 25.0, 50.0, 100.0]);

    assert_eq!(normalized.len(), 4);
    assert_approx_eq!(normalized[1], 0.25);

    let restored = scaler.inverse_transform_all(&normalized);
    assert_approx_eq!(restored[3], 100.0);
}

#[test]
fn loads_parameters_from_artifact() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"data_min": 90.5, "data_max": 310.0}}"#).unwrap();

    let scaler = MinMaxScaler::from_path(file.path()).unwrap();
    assert_approx_eq!(scaler.transform(90.5), 0.0);
    assert_approx_eq!(scaler.transform(310.0), 1.0);
}

#[test]
fn missing_artifact_is_an_artifact_error() {
    let result = MinMaxScaler::from_path("no/such/scaler.json");
    assert!(matches!(result, Err(EngineError::ArtifactError(_))));
}

#[test]
fn corrupt_artifact_is_an_artifact_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "not json at all").unwrap();
    assert!(matches!(
        MinMaxScaler::from_path(file.path()),
        Err(EngineError::ArtifactError(_))
    ));

    // Parsable but degenerate parameters are rejected too
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"data_min": 10.0, "data_max": 10.0}}"#).unwrap();
    assert!(matches!(
        MinMaxScaler::from_path(file.path()),
        Err(EngineError::ArtifactError(_))
    ));
}
