//! Inference Engine - regression model loading and prediction
//!
//! The model is opaque: four features in, one scalar out. Two on-disk
//! formats are understood:
//!
//! - `*.onnx`: any single-output regressor (e.g. a scikit-learn pipeline
//!   exported with skl2onnx), run through ONNX Runtime
//! - `*.json`: fitted linear coefficients, see [`LinearRegressor`]

pub mod linear;
pub mod onnx;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::models::{Prediction, SensorReading, FEATURE_COUNT};

pub use linear::LinearRegressor;
pub use onnx::OnnxRegressor;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported model format: {0:?} (expected .onnx or .json)")]
    UnsupportedFormat(String),

    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model: {0}")]
    Malformed(String),

    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("model returned a non-finite value: {0}")]
    NonFinite(f64),
}

// ============================================================================
// REGRESSOR TRAIT
// ============================================================================

/// A loaded model that maps one feature row to one scalar
pub trait Regressor: Send + Sync {
    /// Backend name, reported in predictions and health output
    fn kind(&self) -> &'static str;

    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, InferenceError>;
}

/// Load a model, choosing the backend by file extension
pub fn load_model(path: &Path) -> Result<Arc<dyn Regressor>, InferenceError> {
    if !path.exists() {
        return Err(InferenceError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "onnx" => Ok(Arc::new(OnnxRegressor::load(path)?)),
        "json" => Ok(Arc::new(LinearRegressor::load(path)?)),
        _ => Err(InferenceError::UnsupportedFormat(extension)),
    }
}

// ============================================================================
// PREDICTOR
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_kind: &'static str,
    pub loaded_at: DateTime<Utc>,
}

/// Engine status for the health probe
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_path: String,
    pub model_kind: &'static str,
    pub loaded_at: DateTime<Utc>,
    pub reload_per_request: bool,
    pub inference_count: u64,
    pub avg_latency_ms: f64,
}

/// Owns the current model and its latency stats
pub struct Predictor {
    model_path: PathBuf,
    reload_per_request: bool,
    model: RwLock<Arc<dyn Regressor>>,
    metadata: RwLock<ModelMetadata>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl Predictor {
    /// Load the model at `model_path`. Fails if the file is missing or unreadable.
    pub fn load(
        model_path: impl Into<PathBuf>,
        reload_per_request: bool,
    ) -> Result<Self, InferenceError> {
        let model_path = model_path.into();
        let model = load_model(&model_path)?;
        let metadata = Self::metadata_for(&model_path, model.as_ref());

        tracing::info!(
            "Model loaded: {} ({})",
            metadata.model_path,
            metadata.model_kind
        );

        Ok(Self {
            model_path,
            reload_per_request,
            model: RwLock::new(model),
            metadata: RwLock::new(metadata),
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        })
    }

    /// Re-read the model file and swap it in
    pub fn reload(&self) -> Result<(), InferenceError> {
        let model = load_model(&self.model_path)?;
        let metadata = Self::metadata_for(&self.model_path, model.as_ref());

        *self.model.write() = model;
        *self.metadata.write() = metadata;

        tracing::debug!("Model reloaded from {}", self.model_path.display());
        Ok(())
    }

    /// Run the model on one reading
    pub fn predict(&self, reading: &SensorReading) -> Result<Prediction, InferenceError> {
        if self.reload_per_request {
            self.reload()?;
        }

        let model = self.model.read().clone();
        let start_time = Instant::now();

        let value = model.predict(&reading.to_features())?;
        if !value.is_finite() {
            return Err(InferenceError::NonFinite(value));
        }

        let inference_time_us = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us
            .fetch_add(inference_time_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            "Prediction via {} in {}us",
            model.kind(),
            inference_time_us
        );

        Ok(Prediction {
            value,
            method: model.kind(),
            inference_time_us,
        })
    }

    pub fn metadata(&self) -> ModelMetadata {
        self.metadata.read().clone()
    }

    pub fn status(&self) -> EngineStatus {
        let metadata = self.metadata();
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 {
            (sum as f64 / count as f64) / 1000.0
        } else {
            0.0
        };

        EngineStatus {
            model_path: metadata.model_path,
            model_kind: metadata.model_kind,
            loaded_at: metadata.loaded_at,
            reload_per_request: self.reload_per_request,
            inference_count: count,
            avg_latency_ms: avg,
        }
    }

    fn metadata_for(path: &Path, model: &dyn Regressor) -> ModelMetadata {
        ModelMetadata {
            model_path: path.display().to_string(),
            model_kind: model.kind(),
            loaded_at: Utc::now(),
        }
    }
}
