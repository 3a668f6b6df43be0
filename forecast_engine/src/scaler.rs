//! Min/max normalization of raw prices
//!
//! The scaler is fitted offline by the training pipeline and shipped as a
//! JSON artifact next to the model weights. At runtime it is loaded once and
//! shared read-only by every request.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Min/max scaler mapping raw values into a bounded target range.
///
/// `transform` maps `[data_min, data_max]` onto `[range_min, range_max]`
/// (the training pipeline uses `[0, 1]`); `inverse_transform` maps back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Minimum of the fitted data
    data_min: f64,
    /// Maximum of the fitted data
    data_max: f64,
    /// Lower bound of the target range
    #[serde(default)]
    range_min: f64,
    /// Upper bound of the target range
    #[serde(default = "default_range_max")]
    range_max: f64,
}

fn default_range_max() -> f64 {
    1.0
}

impl MinMaxScaler {
    /// Create a scaler with explicit parameters, mapping onto `[0, 1]`
    pub fn new(data_min: f64, data_max: f64) -> Result<Self> {
        Self::with_range(data_min, data_max, 0.0, 1.0)
    }

    /// Create a scaler with an explicit target range
    pub fn with_range(data_min: f64, data_max: f64, range_min: f64, range_max: f64) -> Result<Self> {
        let scaler = Self {
            data_min,
            data_max,
            range_min,
            range_max,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load scaler parameters from a JSON artifact
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            EngineError::ArtifactError(format!(
                "cannot open scaler artifact {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let scaler: MinMaxScaler = serde_json::from_reader(BufReader::new(file))?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        let params = [self.data_min, self.data_max, self.range_min, self.range_max];
        if params.iter().any(|p| !p.is_finite()) {
            return Err(EngineError::ArtifactError(
                "scaler parameters must be finite".to_string(),
            ));
        }
        if self.data_max <= self.data_min {
            return Err(EngineError::ArtifactError(format!(
                "scaler data_max ({}) must exceed data_min ({})",
                self.data_max, self.data_min
            )));
        }
        if self.range_max <= self.range_min {
            return Err(EngineError::ArtifactError(format!(
                "scaler range_max ({}) must exceed range_min ({})",
                self.range_max, self.range_min
            )));
        }
        Ok(())
    }

    /// Map a raw value into the target range
    pub fn transform(&self, value: f64) -> f64 {
        let unit = (value - self.data_min) / (self.data_max - self.data_min);
        unit * (self.range_max - self.range_min) + self.range_min
    }

    /// Map a normalized value back to the raw scale
    pub fn inverse_transform(&self, value: f64) -> f64 {
        let unit = (value - self.range_min) / (self.range_max - self.range_min);
        unit * (self.data_max - self.data_min) + self.data_min
    }

    /// Transform a slice of raw values
    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }

    /// Inverse-transform a slice of normalized values
    pub fn inverse_transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.inverse_transform(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn transform_maps_bounds_onto_range() {
        let scaler = MinMaxScaler::new(10.0, 50.0).unwrap();

        assert_approx_eq!(scaler.transform(10.0), 0.0);
        assert_approx_eq!(scaler.transform(50.0), 1.0);
        assert_approx_eq!(scaler.transform(30.0), 0.5);
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        assert!(MinMaxScaler::new(5.0, 5.0).is_err());
        assert!(MinMaxScaler::new(5.0, 1.0).is_err());
        assert!(MinMaxScaler::new(f64::NAN, 1.0).is_err());
    }
}
