//! ONNX Runtime backend
//!
//! Expects a model taking one `float32` tensor of shape `[1, 4]` and
//! producing the prediction as the first element of its first output,
//! which is what skl2onnx emits for scikit-learn regressors.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;

use super::{InferenceError, Regressor};
use crate::models::FEATURE_COUNT;

pub struct OnnxRegressor {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxRegressor {
    /// Load ONNX model from file
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| InferenceError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Runtime(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::Malformed(format!("Failed to load model: {}", e)))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Malformed("No output defined".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, InferenceError> {
        // Single row, model trained on float32
        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), row)
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;

        let input_tensor = Tensor::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError::Runtime("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;

        let value = data
            .first()
            .map(|&v| f64::from(v))
            .ok_or_else(|| InferenceError::Runtime("Empty output tensor".to_string()))?;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy_model.onnx");
        std::fs::write(&path, b"this is not a protobuf graph").unwrap();

        let err = OnnxRegressor::load(&path).err().unwrap();
        assert!(matches!(err, InferenceError::Malformed(_)), "got {}", err);
    }

    #[test]
    fn test_garbage_file_through_load_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy_model.ONNX");
        std::fs::write(&path, [0u8; 16]).unwrap();

        let err = crate::inference::load_model(&path).err().unwrap();
        assert!(matches!(err, InferenceError::Malformed(_)), "got {}", err);
    }
}
