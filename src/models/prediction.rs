//! Prediction model

/// Output of one model call
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Predicted net electrical output (MW)
    pub value: f64,
    /// Model backend that produced the value ("onnx" or "linear")
    pub method: &'static str,
    /// Wall time of the model call, shown under the result card
    pub inference_time_us: u64,
}

impl Prediction {
    /// Display text, two decimals
    pub fn formatted(&self) -> String {
        format!("{:.2} MW", self.value)
    }
}
