//! Predictor page handlers

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    Form,
};

use crate::models::SensorReading;
use crate::page::{self, Outcome, PageView};
use crate::{AppError, AppResult, AppState};

/// Render the form with default inputs
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let html = render(&state, SensorReading::default(), Outcome::Empty)?;
    Ok(Html(html))
}

/// Run the model on the submitted inputs and render the result
pub async fn predict(
    State(state): State<AppState>,
    form: Result<Form<SensorReading>, FormRejection>,
) -> AppResult<(StatusCode, Html<String>)> {
    let Form(reading) = form?;

    // Keep the submitted values in the widgets when rejecting
    if let Err(err) = reading.check() {
        tracing::warn!("Rejected input: {}", err);
        let html = render(&state, reading, Outcome::Failed(err.to_string()))?;
        return Ok((StatusCode::BAD_REQUEST, Html(html)));
    }

    let predictor = state.predictor.clone();
    let result = tokio::task::spawn_blocking(move || predictor.predict(&reading))
        .await
        .map_err(|e| AppError::InternalError(format!("Inference task failed: {}", e)))
        .and_then(|prediction| prediction.map_err(AppError::from));

    // Failures render on the same page with the submitted values
    let (status, outcome) = match result {
        Ok(prediction) => (StatusCode::OK, Outcome::Predicted(prediction)),
        Err(err) => {
            let (status, message) = err.status_and_message();
            (status, Outcome::Failed(message))
        }
    };

    let html = render(&state, reading, outcome)?;
    Ok((status, Html(html)))
}

fn render(state: &AppState, reading: SensorReading, outcome: Outcome) -> AppResult<String> {
    let view = PageView {
        background_image_url: &state.config.background_image_url,
        reading,
        outcome,
    };
    Ok(page::render(&view)?)
}
