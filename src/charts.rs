//! Chart figures
//!
//! Figures are Plotly `{data, layout}` documents, serialized into the page
//! and drawn client-side by plotly.js. Both templates are fixed; only the
//! plotted values change per request.

use serde::Serialize;

use crate::models::{SensorReading, FEATURE_LAYOUT};

/// Bar colours, one per input factor
pub const FACTOR_COLORS: [&str; 4] = ["#636EFA", "#EF553B", "#00CC96", "#AB63FA"];

/// Gauge axis never ends below this
pub const GAUGE_MIN_CEILING: f64 = 200.0;

// ============================================================================
// FIGURE MODEL
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Barpolar {
        r: Vec<f64>,
        theta: Vec<&'static str>,
        marker: Marker,
        name: &'static str,
    },
    Indicator {
        mode: &'static str,
        value: f64,
        title: Title,
        gauge: Gauge,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Gauge {
    pub axis: GaugeAxis,
    pub bar: GaugeBar,
    pub bgcolor: &'static str,
    pub borderwidth: u32,
    pub bordercolor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeAxis {
    /// `[null, upper]`: lower bound left to plotly
    pub range: [Option<f64>; 2],
    pub tickwidth: u32,
    pub tickcolor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GaugeBar {
    pub color: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polar: Option<Polar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Polar {
    pub radialaxis: RadialAxis,
    pub angularaxis: AngularAxis,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadialAxis {
    pub range: [f64; 2],
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AngularAxis {
    pub tickfont: Font,
}

impl Figure {
    /// JSON safe for embedding inside a `<script>` element
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(self)?.replace("</", "<\\/"))
    }
}

// ============================================================================
// TEMPLATES
// ============================================================================

/// Polar bar chart of the raw input values
pub fn input_factors(reading: &SensorReading) -> Figure {
    Figure {
        data: vec![Trace::Barpolar {
            r: reading.to_features().to_vec(),
            theta: FEATURE_LAYOUT.iter().map(|spec| spec.label).collect(),
            marker: Marker {
                color: FACTOR_COLORS.to_vec(),
            },
            name: "Input Values",
        }],
        layout: Layout {
            title: Some(Title {
                text: "Input Factor Values",
                font: None,
            }),
            font: Some(Font { size: 16 }),
            // Pressure sits near 1000 and overshoots the fixed 0-100 axis
            polar: Some(Polar {
                radialaxis: RadialAxis {
                    range: [0.0, 100.0],
                    visible: true,
                },
                angularaxis: AngularAxis {
                    tickfont: Font { size: 12 },
                },
            }),
            showlegend: Some(false),
        },
    }
}

/// Gauge of the predicted output
pub fn energy_gauge(value: f64) -> Figure {
    Figure {
        data: vec![Trace::Indicator {
            mode: "gauge+number",
            value,
            title: Title {
                text: "Energy Production (MW)",
                font: Some(Font { size: 20 }),
            },
            gauge: Gauge {
                axis: GaugeAxis {
                    range: [None, Some(gauge_ceiling(value))],
                    tickwidth: 1,
                    tickcolor: "darkblue",
                },
                bar: GaugeBar { color: "green" },
                bgcolor: "lightgray",
                borderwidth: 2,
                bordercolor: "gray",
            },
        }],
        layout: Layout::default(),
    }
}

/// Upper end of the gauge axis: 1.5x the value, at least 200
pub fn gauge_ceiling(value: f64) -> f64 {
    GAUGE_MIN_CEILING.max(value * 1.5)
}
