//! Sequence model inference
//!
//! The forecaster only depends on the narrow [`SequenceModel`] capability: a
//! fixed-length window of normalized scalars in, one normalized scalar out.
//! The shipped implementation is a stacked LSTM regression network whose
//! weights are exported by the training pipeline as a JSON artifact.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A trained point-forecast model: fixed-length window in, one scalar out.
pub trait SequenceModel: Send + Sync + std::fmt::Debug {
    /// Window length the model was trained on
    fn input_len(&self) -> usize;

    /// Predict the next normalized value from a window of `input_len()` values
    fn predict_next(&self, window: &[f64]) -> Result<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Weights for one recurrent layer.
///
/// Rows of `w_input`/`w_hidden` and entries of `bias` are laid out as four
/// consecutive gate blocks of `hidden_size` each, in input/forget/cell/output
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmLayerWeights {
    /// Number of recurrent units
    pub hidden_size: usize,
    /// Input weights, `4 * hidden_size` rows of `input_size` columns
    pub w_input: Vec<Vec<f64>>,
    /// Recurrent weights, `4 * hidden_size` rows of `hidden_size` columns
    pub w_hidden: Vec<Vec<f64>>,
    /// Gate biases, `4 * hidden_size` entries
    pub bias: Vec<f64>,
}

/// Weights for one dense (linear) layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseWeights {
    /// Weight matrix, one row per output unit
    pub weights: Vec<Vec<f64>>,
    /// Bias, one entry per output unit
    pub bias: Vec<f64>,
}

/// Serialized network: window length, recurrent stack, dense head
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkWeights {
    /// Window length the network was trained on
    pub sequence_length: usize,
    /// Scalar features per timestep (the close price only)
    pub input_size: usize,
    /// Recurrent layers, applied in order
    pub lstm_layers: Vec<LstmLayerWeights>,
    /// Dense head, applied in order; the last layer has a single unit
    pub dense_layers: Vec<DenseWeights>,
}

/// Stacked LSTM regression model loaded from a weight artifact
#[derive(Debug, Clone)]
pub struct LstmModel {
    name: String,
    weights: NetworkWeights,
}

impl LstmModel {
    /// Load and shape-validate a weight artifact
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            EngineError::ArtifactError(format!(
                "cannot open model artifact {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let weights: NetworkWeights = serde_json::from_reader(BufReader::new(file))?;
        Self::from_weights(weights)
    }

    /// Build a model from already-deserialized weights
    pub fn from_weights(weights: NetworkWeights) -> Result<Self> {
        validate_weights(&weights)?;
        Ok(Self {
            name: format!(
                "LSTM (layers={}, window={})",
                weights.lstm_layers.len(),
                weights.sequence_length
            ),
            weights,
        })
    }

    /// Run one recurrent layer over a sequence of input vectors
    fn run_lstm_layer(layer: &LstmLayerWeights, inputs: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let h_size = layer.hidden_size;
        let mut hidden = vec![0.0; h_size];
        let mut cell = vec![0.0; h_size];
        let mut outputs = Vec::with_capacity(inputs.len());

        for x in inputs {
            // Pre-activations for all four gates
            let mut gates = layer.bias.clone();
            for (row, gate) in layer.w_input.iter().zip(gates.iter_mut()) {
                *gate += dot(row, x);
            }
            for (row, gate) in layer.w_hidden.iter().zip(gates.iter_mut()) {
                *gate += dot(row, &hidden);
            }

            for u in 0..h_size {
                let i = sigmoid(gates[u]);
                let f = sigmoid(gates[h_size + u]);
                let g = gates[2 * h_size + u].tanh();
                let o = sigmoid(gates[3 * h_size + u]);

                cell[u] = f * cell[u] + i * g;
                hidden[u] = o * cell[u].tanh();
            }

            outputs.push(hidden.clone());
        }

        outputs
    }

    /// Run the dense head on the final hidden state
    fn run_dense(&self, mut activation: Vec<f64>) -> f64 {
        for layer in &self.weights.dense_layers {
            let mut next = Vec::with_capacity(layer.weights.len());
            for (row, b) in layer.weights.iter().zip(layer.bias.iter()) {
                next.push(dot(row, &activation) + b);
            }
            activation = next;
        }
        activation[0]
    }
}

impl SequenceModel for LstmModel {
    fn input_len(&self) -> usize {
        self.weights.sequence_length
    }

    fn predict_next(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.input_len() {
            return Err(EngineError::ValidationError(format!(
                "window length ({}) doesn't match model input length ({})",
                window.len(),
                self.input_len()
            )));
        }

        // One scalar feature per timestep
        let mut sequence: Vec<Vec<f64>> = window.iter().map(|&v| vec![v]).collect();
        for layer in &self.weights.lstm_layers {
            sequence = Self::run_lstm_layer(layer, &sequence);
        }

        let last_hidden = sequence
            .pop()
            .ok_or_else(|| EngineError::ModelError("empty input sequence".to_string()))?;

        let prediction = self.run_dense(last_hidden);
        if !prediction.is_finite() {
            return Err(EngineError::ModelError(
                "model produced a non-finite prediction".to_string(),
            ));
        }

        Ok(prediction)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Validate artifact shapes so a corrupt file fails at load, not mid-request
fn validate_weights(weights: &NetworkWeights) -> Result<()> {
    if weights.sequence_length == 0 {
        return Err(EngineError::ArtifactError(
            "sequence_length must be positive".to_string(),
        ));
    }
    if weights.input_size != 1 {
        return Err(EngineError::ArtifactError(format!(
            "expected a single feature per timestep, artifact declares {}",
            weights.input_size
        )));
    }
    if weights.lstm_layers.is_empty() || weights.dense_layers.is_empty() {
        return Err(EngineError::ArtifactError(
            "artifact must contain at least one recurrent and one dense layer".to_string(),
        ));
    }

    let mut in_size = weights.input_size;
    for (idx, layer) in weights.lstm_layers.iter().enumerate() {
        let gates = 4 * layer.hidden_size;
        if layer.hidden_size == 0 {
            return Err(EngineError::ArtifactError(format!(
                "lstm layer {} has zero hidden units",
                idx
            )));
        }
        if layer.w_input.len() != gates || layer.w_hidden.len() != gates || layer.bias.len() != gates
        {
            return Err(EngineError::ArtifactError(format!(
                "lstm layer {} gate count doesn't match hidden_size {}",
                idx, layer.hidden_size
            )));
        }
        if layer.w_input.iter().any(|row| row.len() != in_size) {
            return Err(EngineError::ArtifactError(format!(
                "lstm layer {} input weights don't match input size {}",
                idx, in_size
            )));
        }
        if layer.w_hidden.iter().any(|row| row.len() != layer.hidden_size) {
            return Err(EngineError::ArtifactError(format!(
                "lstm layer {} recurrent weights don't match hidden_size {}",
                idx, layer.hidden_size
            )));
        }
        in_size = layer.hidden_size;
    }

    for (idx, layer) in weights.dense_layers.iter().enumerate() {
        if layer.weights.is_empty() || layer.weights.len() != layer.bias.len() {
            return Err(EngineError::ArtifactError(format!(
                "dense layer {} weight rows don't match bias length",
                idx
            )));
        }
        if layer.weights.iter().any(|row| row.len() != in_size) {
            return Err(EngineError::ArtifactError(format!(
                "dense layer {} weights don't match input size {}",
                idx, in_size
            )));
        }
        in_size = layer.weights.len();
    }

    if in_size != 1 {
        return Err(EngineError::ArtifactError(format!(
            "final dense layer must have a single output unit, found {}",
            in_size
        )));
    }

    Ok(())
}
