//! Linear regression model stored as JSON
//!
//! ```json
//! { "coefficients": [-1.977, -0.234, 0.062, -0.158], "intercept": 454.6 }
//! ```
//!
//! Coefficients follow feature order. Output is
//! `intercept + Σ coefficients[i] * features[i]`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{InferenceError, Regressor};
use crate::models::FEATURE_COUNT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        tracing::info!("Loading linear model from: {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse and check shape. Coefficient count must equal the feature count.
    pub fn from_json(raw: &str) -> Result<Self, InferenceError> {
        let model: Self =
            serde_json::from_str(raw).map_err(|e| InferenceError::Malformed(e.to_string()))?;

        if model.coefficients.len() != FEATURE_COUNT {
            return Err(InferenceError::Malformed(format!(
                "expected {} coefficients, found {}",
                FEATURE_COUNT,
                model.coefficients.len()
            )));
        }

        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InferenceError::Malformed(
                "coefficients must be finite".to_string(),
            ));
        }

        Ok(model)
    }
}

impl Regressor for LinearRegressor {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, InferenceError> {
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict() {
        let model =
            LinearRegressor::from_json(r#"{"coefficients":[1.0,2.0,0.5,-1.0],"intercept":10.0}"#)
                .unwrap();
        let value = model.predict(&[1.0, 1.0, 4.0, 3.0]).unwrap();
        assert_eq!(value, 10.0 + 1.0 + 2.0 + 2.0 - 3.0);
    }

    #[test]
    fn test_wrong_coefficient_count() {
        let err = LinearRegressor::from_json(r#"{"coefficients":[1.0,2.0],"intercept":0.0}"#)
            .unwrap_err();
        assert!(matches!(err, InferenceError::Malformed(_)));
        assert!(err.to_string().contains("expected 4 coefficients"));
    }

    #[test]
    fn test_not_json() {
        let err = LinearRegressor::from_json("coefficients = 1").unwrap_err();
        assert!(matches!(err, InferenceError::Malformed(_)));
    }

    #[test]
    fn test_missing_intercept() {
        let err = LinearRegressor::from_json(r#"{"coefficients":[1.0,2.0,3.0,4.0]}"#).unwrap_err();
        assert!(matches!(err, InferenceError::Malformed(_)));
    }
}
