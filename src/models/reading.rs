//! Sensor reading - the four-element feature vector fed to the model
//!
//! Feature order is fixed: the model was fitted on
//! `[temperature, exhaust_vacuum, ambient_pressure, relative_humidity]`.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of model input features
pub const FEATURE_COUNT: usize = 4;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Static description of one input widget
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    /// Form field name
    pub key: &'static str,
    pub label: &'static str,
    /// Short symbol used in the instruction list
    pub symbol: &'static str,
    pub icon: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub description: &'static str,
}

impl FeatureSpec {
    /// Widget label, e.g. `🌡️ Temperature (°C)`
    pub fn widget_label(&self) -> String {
        format!("{} {} ({})", self.icon, self.label, self.unit)
    }
}

/// Input layout in model order
pub const FEATURE_LAYOUT: [FeatureSpec; FEATURE_COUNT] = [
    FeatureSpec {
        key: "temperature",
        label: "Temperature",
        symbol: "T",
        icon: "🌡️",
        unit: "°C",
        min: -50.0,
        max: 100.0,
        default: 25.0,
        description: "Impact of environmental temperature on energy production.",
    },
    FeatureSpec {
        key: "exhaust_vacuum",
        label: "Exhaust Vacuum",
        symbol: "V",
        icon: "🌀",
        unit: "cm Hg",
        min: 0.0,
        max: 100.0,
        default: 50.0,
        description: "Effect of exhaust vacuum on the system.",
    },
    FeatureSpec {
        key: "ambient_pressure",
        label: "Ambient Pressure",
        symbol: "AP",
        icon: "🌬️",
        unit: "mbar",
        min: 0.0,
        max: 1100.0,
        default: 1013.0,
        description: "Ambient pressure's role in energy production.",
    },
    FeatureSpec {
        key: "relative_humidity",
        label: "Relative Humidity",
        symbol: "RH",
        icon: "💧",
        unit: "%",
        min: 0.0,
        max: 100.0,
        default: 50.0,
        description: "Influence of humidity levels on efficiency.",
    },
];

// ============================================================================
// READING
// ============================================================================

/// One set of user-entered sensor values.
///
/// Range attributes mirror `FEATURE_LAYOUT`; `check()` enforces both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct SensorReading {
    #[validate(range(min = -50.0, max = 100.0))]
    pub temperature: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub exhaust_vacuum: f64,

    #[validate(range(min = 0.0, max = 1100.0))]
    pub ambient_pressure: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub relative_humidity: f64,
}

/// A reading value outside its widget bounds
#[derive(Debug, Clone, PartialEq)]
pub struct OutOfRange {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl std::fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} must be between {} and {} (got {})",
            self.field, self.min, self.max, self.value
        )
    }
}

impl SensorReading {
    pub fn new(
        temperature: f64,
        exhaust_vacuum: f64,
        ambient_pressure: f64,
        relative_humidity: f64,
    ) -> Self {
        Self {
            temperature,
            exhaust_vacuum,
            ambient_pressure,
            relative_humidity,
        }
    }

    /// Feature vector in model order
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.temperature,
            self.exhaust_vacuum,
            self.ambient_pressure,
            self.relative_humidity,
        ]
    }

    /// Reject non-finite values and anything outside the widget bounds.
    ///
    /// Reports the first offending field in layout order.
    pub fn check(&self) -> Result<(), OutOfRange> {
        // NaN compares false against both bounds, so the range attributes let it through
        let non_finite = FEATURE_LAYOUT
            .iter()
            .zip(self.to_features())
            .find(|(_, value)| !value.is_finite())
            .map(|(spec, _)| spec.key);

        let invalid = non_finite.or_else(|| {
            let errors = self.validate().err()?;
            let fields = errors.field_errors();
            FEATURE_LAYOUT
                .iter()
                .map(|spec| spec.key)
                .find(|key| fields.keys().any(|name| *name == *key))
        });

        match invalid {
            None => Ok(()),
            Some(key) => Err(self.out_of_range(key)),
        }
    }

    fn out_of_range(&self, key: &'static str) -> OutOfRange {
        let spec = FEATURE_LAYOUT
            .iter()
            .find(|s| s.key == key)
            .copied()
            .unwrap_or(FEATURE_LAYOUT[0]);
        OutOfRange {
            field: spec.key,
            value: self.value_of(key).unwrap_or(f64::NAN),
            min: spec.min,
            max: spec.max,
        }
    }

    /// Value by form field name
    pub fn value_of(&self, key: &str) -> Option<f64> {
        FEATURE_LAYOUT
            .iter()
            .position(|s| s.key == key)
            .map(|i| self.to_features()[i])
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self::new(
            FEATURE_LAYOUT[0].default,
            FEATURE_LAYOUT[1].default,
            FEATURE_LAYOUT[2].default,
            FEATURE_LAYOUT[3].default,
        )
    }
}

impl From<[f64; FEATURE_COUNT]> for SensorReading {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reading() {
        let reading = SensorReading::default();
        assert_eq!(reading.to_features(), [25.0, 50.0, 1013.0, 50.0]);
        assert!(reading.check().is_ok());
    }

    #[test]
    fn test_feature_order() {
        let reading = SensorReading::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(reading.to_features(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(reading.value_of("ambient_pressure"), Some(3.0));
        assert_eq!(reading.value_of("wind_speed"), None);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let low = SensorReading::from(FEATURE_LAYOUT.map(|s| s.min));
        let high = SensorReading::from(FEATURE_LAYOUT.map(|s| s.max));
        assert!(low.check().is_ok());
        assert!(high.check().is_ok());
    }

    #[test]
    fn test_each_field_rejects_out_of_range() {
        for (i, spec) in FEATURE_LAYOUT.iter().enumerate() {
            let mut values = SensorReading::default().to_features();

            values[i] = spec.max + 0.01;
            let err = SensorReading::from(values).check().unwrap_err();
            assert_eq!(err.field, spec.key);

            values[i] = spec.min - 0.01;
            let err = SensorReading::from(values).check().unwrap_err();
            assert_eq!(err.field, spec.key);
        }
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut reading = SensorReading::default();
        reading.relative_humidity = f64::NAN;
        assert_eq!(reading.check().unwrap_err().field, "relative_humidity");

        reading.relative_humidity = 50.0;
        reading.temperature = f64::INFINITY;
        assert_eq!(reading.check().unwrap_err().field, "temperature");
    }

    #[test]
    fn test_validator_attributes_match_layout() {
        // The derive and the layout table must agree on every bound
        for (i, spec) in FEATURE_LAYOUT.iter().enumerate() {
            let mut values = SensorReading::default().to_features();
            values[i] = spec.max;
            assert!(SensorReading::from(values).validate().is_ok());
            values[i] = spec.max + 1.0;
            assert!(SensorReading::from(values).validate().is_err());
            values[i] = spec.min;
            assert!(SensorReading::from(values).validate().is_ok());
            values[i] = spec.min - 1.0;
            assert!(SensorReading::from(values).validate().is_err());
        }
    }

    #[test]
    fn test_out_of_range_message() {
        let mut reading = SensorReading::default();
        reading.ambient_pressure = 1200.0;
        let err = reading.check().unwrap_err();
        assert_eq!(
            err.to_string(),
            "ambient_pressure must be between 0 and 1100 (got 1200)"
        );
    }

    #[test]
    fn test_widget_label() {
        assert_eq!(FEATURE_LAYOUT[1].widget_label(), "🌀 Exhaust Vacuum (cm Hg)");
    }
}
