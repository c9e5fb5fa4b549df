//! Inference Engine - ONNX Runtime Integration
//!
//! The classifier is exported to ONNX with the zipmap disabled, so its
//! probability output is a plain `[1, n_classes]` f32 tensor. Class 1 is
//! dropout.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;

use crate::logic::features::FeatureVector;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("failed to load model: {0}")]
    Load(String),

    #[error("tensor error: {0}")]
    Tensor(String),

    #[error("inference failed: {0}")]
    Run(String),

    #[error("model has no output named '{0}'")]
    MissingOutput(String),

    #[error("unexpected probability output shape {0:?}")]
    UnexpectedShape(Vec<i64>),

    #[error("model returned an invalid probability: {0}")]
    InvalidProbability(f64),
}

// ============================================================================
// RISK MODEL TRAIT
// ============================================================================

/// Trait cho risk models (ONNX, test doubles, ...)
pub trait RiskModel: Send + Sync {
    /// Human readable identifier, e.g. the file it was loaded from
    fn name(&self) -> &str;

    /// Probability of the positive (dropout) class
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError>;
}

/// Reject anything that is not a probability
pub fn check_probability(p: f64) -> Result<f64, InferenceError> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(InferenceError::InvalidProbability(p))
    }
}

/// f32 -> f64 through the shortest decimal that round-trips, so 0.37f32
/// becomes 0.37 and not 0.37000000476837158. Banding compares against
/// decimal thresholds.
pub fn widen_probability(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(value as f64)
}

/// Pick the dropout probability out of a probability tensor.
///
/// `[1, 2]` (or `[2]`) -> column 1, `[1, 1]` (or `[1]`) -> column 0.
pub fn positive_class_probability(shape: &[i64], data: &[f32]) -> Result<f64, InferenceError> {
    let columns = match shape {
        [n] | [1, n] => *n,
        _ => return Err(InferenceError::UnexpectedShape(shape.to_vec())),
    };

    let index = match columns {
        1 => 0,
        2 => 1,
        _ => return Err(InferenceError::UnexpectedShape(shape.to_vec())),
    };

    let value = data
        .get(index)
        .copied()
        .ok_or_else(|| InferenceError::UnexpectedShape(shape.to_vec()))?;

    check_probability(widen_probability(value))
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX classifier. `Session::run` needs `&mut`, hence the lock.
pub struct OnnxRiskModel {
    session: Mutex<Session>,
    name: String,
    output_name: String,
}

impl std::fmt::Debug for OnnxRiskModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxRiskModel")
            .field("name", &self.name)
            .field("output_name", &self.output_name)
            .finish()
    }
}

impl OnnxRiskModel {
    /// Load ONNX model từ file
    pub fn load(model_path: &Path, probability_output: &str) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError::Load(format!("Model not found: {}", model_path.display())));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Load(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Load(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Load(format!("Failed to load model: {}", e)))?;

        let model = Self::from_session(session, model_path.display().to_string(), probability_output);
        log::info!("ONNX model loaded (output: {})", model.output_name());
        Ok(model)
    }

    fn from_session(session: Session, name: String, probability_output: &str) -> Self {
        // Fall back to the last output when the configured name is absent
        let output_name = if session.outputs.iter().any(|o| o.name == probability_output) {
            probability_output.to_string()
        } else {
            let fallback = session
                .outputs
                .last()
                .map(|o| o.name.clone())
                .unwrap_or_else(|| probability_output.to_string());
            log::warn!(
                "Output '{}' not found in model, using '{}'",
                probability_output,
                fallback
            );
            fallback
        };

        Self {
            session: Mutex::new(session),
            name,
            output_name,
        }
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}

impl RiskModel for OnnxRiskModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let start_time = std::time::Instant::now();

        let input_array = Array2::<f32>::from_shape_vec((1, features.len()), features.to_f32())
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;

        let input_tensor = Tensor::from_array(input_array)
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Run(e.to_string()))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| InferenceError::MissingOutput(self.output_name.clone()))?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;
        let dims: Vec<i64> = shape.iter().copied().collect();

        let probability = positive_class_probability(&dims, data)?;

        log::debug!(
            "ONNX inference: p={:.4} in {}us",
            probability,
            start_time.elapsed().as_micros()
        );

        Ok(probability)
    }
}

// ============================================================================
// TESTS
// ============================================================================
