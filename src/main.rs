//! Energy Production Predictor
//!
//! Single-page web form that runs a pre-trained regression model on four
//! ambient readings of a combined-cycle power plant and shows the predicted
//! net electrical output.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 ENERGY PRODUCTION PREDICTOR              │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐    ┌───────────┐    ┌──────────────────┐  │
//! │  │  Page     │    │ Predictor │    │  Charts          │  │
//! │  │  (Axum)   │───▶│ (ONNX /   │    │  (Plotly JSON)   │  │
//! │  │           │    │  linear)  │    │                  │  │
//! │  └─────┬─────┘    └─────┬─────┘    └──────────────────┘  │
//! │        │                ▼                                │
//! │        │         ┌─────────────┐                         │
//! │        │         │ model file  │                         │
//! │        │         └─────────────┘                         │
//! └────────┴─────────────────────────────────────────────────┘
//! ```

mod charts;
mod config;
mod error;
mod handlers;
mod inference;
mod models;
mod page;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG from it applies
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "energy_predictor=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    tracing::info!("Energy Production Predictor starting...");
    tracing::info!(
        "Model: {} (reload per request: {})",
        config.model_path.display(),
        config.reload_model_per_request
    );

    // A missing or corrupt model is fatal
    let predictor = inference::Predictor::load(&config.model_path, config.reload_model_per_request)
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<inference::Predictor>,
    pub config: config::Config,
}

/// Create the main router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::predictor::index))
        .route("/predict", post(handlers::predictor::predict))
        .route("/health", get(handlers::health::check))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::inference::tests::{write_linear_model, PLANT_COEFFICIENTS, PLANT_INTERCEPT};

    fn test_app() -> (tempfile::TempDir, Router) {
        test_app_with(Config::default(), false)
    }

    /// Router over a linear model in a temp dir; `base` supplies everything but the model path
    fn test_app_with(base: Config, reload_per_request: bool) -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_linear_model(&dir, PLANT_COEFFICIENTS, PLANT_INTERCEPT);
        let config = Config {
            model_path: path.clone(),
            reload_model_per_request: reload_per_request,
            ..base
        };
        let predictor = inference::Predictor::load(&path, reload_per_request).unwrap();
        let state = AppState {
            predictor: Arc::new(predictor),
            config,
        };
        (dir, create_router(state))
    }

    fn form_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_form() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Input Parameters"));
        assert!(html.contains("value=\"25.00\""));
        assert!(!html.contains("Plotly.newPlot"));
    }

    #[tokio::test]
    async fn test_predict_example_scenario() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(form_request(
                "temperature=25.0&exhaust_vacuum=50.0&ambient_pressure=1013.0&relative_humidity=50.0",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        // 454.6 - 1.977*25 - 0.234*50 + 0.062*1013 - 0.158*50
        assert!(html.contains("448.38 MW"));
        assert!(html.contains("Plotly.newPlot('input-factors'"));
        assert!(html.contains("Plotly.newPlot('energy-gauge'"));
    }

    #[tokio::test]
    async fn test_predict_keeps_submitted_values() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(form_request(
                "temperature=12.5&exhaust_vacuum=40&ambient_pressure=1000&relative_humidity=80",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("name=\"temperature\" min=\"-50.00\" max=\"100.00\" step=\"0.01\" value=\"12.50\""));
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(form_request(
                "temperature=25&exhaust_vacuum=50&ambient_pressure=1200&relative_humidity=50",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("ambient_pressure must be between 0 and 1100"));
        assert!(!html.contains("Plotly.newPlot"));
    }

    #[tokio::test]
    async fn test_predict_rejects_nan() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(form_request(
                "temperature=NaN&exhaust_vacuum=50&ambient_pressure=1013&relative_humidity=50",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_rejects_missing_field() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(form_request("temperature=25&exhaust_vacuum=50"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("error-card\" role=\"alert\""));
    }

    #[tokio::test]
    async fn test_model_failure_renders_on_same_page() {
        let base = Config {
            background_image_url: "https://example.org/custom.jpg".to_string(),
            ..Default::default()
        };
        let (dir, app) = test_app_with(base, true);
        std::fs::remove_file(dir.path().join("energy_model.json")).unwrap();

        let response = app
            .oneshot(form_request(
                "temperature=12.5&exhaust_vacuum=40&ambient_pressure=1000&relative_humidity=80",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = body_text(response).await;
        assert!(html.contains("error-card\" role=\"alert\""));
        assert!(html.contains("Prediction failed"));
        assert!(html.contains("https://example.org/custom.jpg"));
        assert!(html.contains("name=\"temperature\" min=\"-50.00\" max=\"100.00\" step=\"0.01\" value=\"12.50\""));
        assert!(!html.contains("Plotly.newPlot"));
    }

    #[tokio::test]
    async fn test_health_reports_engine() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["engine"]["model_kind"], "linear");
        assert_eq!(body["engine"]["inference_count"], 0);
    }
}
