//! Error handling

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::config::DEFAULT_BACKGROUND_IMAGE_URL;
use crate::inference::InferenceError;
use crate::models::SensorReading;
use crate::page::{self, Outcome, PageView};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Bad or missing form input
    ValidationError(String),

    // Model load or inference failure
    ModelError(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    /// HTTP status and the message shown in the error card.
    ///
    /// Server-side failures are logged here and shown to the user without detail.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ModelError(msg) => {
                tracing::error!("Model error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Prediction failed: the model could not be run".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

/// Used only where no submitted reading exists (e.g. an undecodable form);
/// the page falls back to default inputs.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let view = PageView {
            background_image_url: DEFAULT_BACKGROUND_IMAGE_URL,
            reading: SensorReading::default(),
            outcome: Outcome::Failed(error_message.clone()),
        };

        match page::render(&view) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, error_message).into_response(),
        }
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::ModelError(err.to_string())
    }
}

impl From<FormRejection> for AppError {
    fn from(err: FormRejection) -> Self {
        AppError::ValidationError(err.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}
