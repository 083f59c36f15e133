use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("SQL generation failed: {0}")]
    GenerationFailed(String),

    #[error("SQL execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Training failed: {0}")]
    TrainingFailed(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match self {
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new("SERVICE_UNAVAILABLE", msg),
            ),
            AppError::GenerationFailed(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("SQL_GENERATION_FAILED", msg),
            ),
            AppError::ExecutionFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("SQL_EXECUTION_FAILED", format!("SQL execution failed: {}", msg)),
            ),
            AppError::TrainingFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("TRAINING_FAILED", format!("Training failed: {}", msg)),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_detail,
        });

        (status, body).into_response()
    }
}
