//! Page rendering
//!
//! The whole UI is one server-rendered HTML document. Inputs live in a
//! sidebar form that posts back to `/predict`; the response is the same page
//! with the result card and both charts filled in.

use std::fmt::Write;

use crate::charts::{self, Figure};
use crate::models::{Prediction, SensorReading, FEATURE_LAYOUT};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const FAVICON: &str = "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>⚡</text></svg>";

/// Base stylesheet. `{background}` is substituted with the image URL.
const PAGE_STYLE: &str = r#"
[data-testid="stAppViewContainer"] {
    background: url("{background}");
    background-size: cover;
    background-position: center;
    background-attachment: fixed;
    min-height: 100vh;
    margin: 0;
    display: flex;
    font-family: "Source Sans Pro", sans-serif;
}
[data-testid="stSidebar"] {
    background-color: rgba(0, 0, 0, 0.8);
    color: white;
    width: 21rem;
    padding: 2rem 1.5rem;
    box-sizing: border-box;
}
[data-testid="stSidebar"] label {
    display: block;
    margin: 1rem 0 0.25rem;
}
[data-testid="stSidebar"] input {
    width: 100%;
    padding: 0.4rem;
    border-radius: 0.4rem;
    border: none;
    box-sizing: border-box;
}
.main {
    flex: 1;
    max-width: 46rem;
    margin: 0 auto;
    padding: 3rem 1rem;
}
h1, h2, h3, h4, h5, h6, p {
    color: white;
    text-shadow: 2px 2px 4px rgba(0, 0, 0, 0.6);
}
.instructions li {
    color: white;
}
.predict-button {
    padding: 0.5rem 1rem;
    border-radius: 0.5rem;
    border: 1px solid rgba(49, 51, 63, 0.2);
    background: white;
    cursor: pointer;
}
.result-card {
    background-color: rgba(255, 255, 255, 0.8);
    padding: 10px;
    border-radius: 10px;
    text-align: center;
    margin-top: 1rem;
}
.result-card .caption {
    color: #555;
    text-shadow: none;
    font-size: 0.8rem;
    margin: 0;
}
.result-card h2 {
    color: black;
    text-shadow: none;
}
.error-card {
    background-color: rgba(255, 43, 43, 0.85);
    color: white;
    padding: 10px;
    border-radius: 10px;
    margin-top: 1rem;
}
.chart {
    background: white;
    margin-top: 1rem;
    border-radius: 10px;
}
.footer {
    text-align: center;
    margin-top: 3rem;
}
"#;

/// Everything needed to render one page
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub background_image_url: &'a str,
    /// Values shown in the input widgets
    pub reading: SensorReading,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    /// Fresh page, nothing predicted yet
    Empty,
    Predicted(Prediction),
    Failed(String),
}

/// Render the full page
pub fn render(view: &PageView<'_>) -> Result<String, serde_json::Error> {
    let charts = match &view.outcome {
        Outcome::Predicted(prediction) => Some((
            charts::input_factors(&view.reading),
            charts::energy_gauge(prediction.value),
        )),
        _ => None,
    };

    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Energy Production Predictor</title>\n");
    let _ = writeln!(html, "<link rel=\"icon\" href=\"{}\">", FAVICON);
    if charts.is_some() {
        let _ = writeln!(html, "<script src=\"{}\" charset=\"utf-8\"></script>", PLOTLY_CDN);
    }
    let _ = writeln!(
        html,
        "<style>{}</style>",
        PAGE_STYLE.replace("{background}", &escape_css_string(view.background_image_url))
    );
    html.push_str("</head>\n<body style=\"margin: 0;\">\n");

    html.push_str(
        "<form method=\"post\" action=\"/predict\" data-testid=\"stAppViewContainer\">\n",
    );
    render_sidebar(&mut html, &view.reading);

    html.push_str("<main class=\"main\">\n");
    html.push_str(
        "<h1 style='text-align: center;'>⚡ Energy Production Prediction App ⚡</h1>\n",
    );
    render_instructions(&mut html);
    html.push_str(
        "<button type=\"submit\" class=\"predict-button\">Predict Energy Production</button>\n",
    );

    match &view.outcome {
        Outcome::Empty => {}
        Outcome::Predicted(prediction) => {
            let _ = writeln!(
                html,
                "<div class=\"result-card\"><h2>🔋 Predicted Energy Production: \
                 <span style='color:green;'>{}</span></h2>\
                 <p class=\"caption\">{} model, {} µs</p></div>",
                prediction.formatted(),
                prediction.method,
                prediction.inference_time_us
            );
        }
        Outcome::Failed(message) => {
            let _ = writeln!(
                html,
                "<div class=\"error-card\" role=\"alert\">{}</div>",
                escape_html(message)
            );
        }
    }

    if let Some((input_chart, gauge_chart)) = &charts {
        html.push_str("<div id=\"input-factors\" class=\"chart\"></div>\n");
        html.push_str("<div id=\"energy-gauge\" class=\"chart\"></div>\n");
        html.push_str("<script>\n");
        render_plot(&mut html, "input-factors", input_chart)?;
        render_plot(&mut html, "energy-gauge", gauge_chart)?;
        html.push_str("</script>\n");
    }

    html.push_str(
        "<h4 class=\"footer\" style='color:white;text-align:center;'>Powered by Machine Learning ⚙️</h4>\n",
    );
    html.push_str("</main>\n</form>\n</body>\n</html>\n");

    Ok(html)
}

fn render_sidebar(html: &mut String, reading: &SensorReading) {
    html.push_str("<aside data-testid=\"stSidebar\">\n<h2>Input Parameters</h2>\n");

    for (spec, value) in FEATURE_LAYOUT.iter().zip(reading.to_features()) {
        let _ = writeln!(
            html,
            "<label for=\"{key}\">{label}</label>\n\
             <input type=\"number\" id=\"{key}\" name=\"{key}\" \
             min=\"{min:.2}\" max=\"{max:.2}\" step=\"0.01\" value=\"{value:.2}\" required>",
            key = spec.key,
            label = spec.widget_label(),
            min = spec.min,
            max = spec.max,
            value = value,
        );
    }

    html.push_str("</aside>\n");
}

fn render_instructions(html: &mut String) {
    html.push_str(
        "<h3><span style='color:white;'>🌡️ Predict energy production based on the following inputs:</span></h3>\n",
    );
    html.push_str("<ul class=\"instructions\">\n");
    for spec in FEATURE_LAYOUT.iter() {
        let _ = writeln!(
            html,
            "<li><span style='color:white;'><strong>{} ({})</strong>: {}</span></li>",
            spec.label, spec.symbol, spec.description
        );
    }
    html.push_str("</ul>\n");
}

fn render_plot(html: &mut String, target: &str, figure: &Figure) -> Result<(), serde_json::Error> {
    let json = figure.to_script_json()?;
    let _ = writeln!(
        html,
        "(function () {{ var fig = {}; Plotly.newPlot('{}', fig.data, fig.layout); }})();",
        json, target
    );
    Ok(())
}

/// Escape a value for a double-quoted CSS string.
///
/// `<` is escaped too so the value cannot close the `<style>` element.
pub fn escape_css_string(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '<' => escaped.push_str("\\3c "),
            '\n' => escaped.push_str("\\a "),
            '\r' => escaped.push_str("\\d "),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Minimal escaping for text and attribute content
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
