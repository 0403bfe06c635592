use axum::response::IntoResponse;
use axum::Json;
use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Failures from the external text-generation service.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,
    #[error("LLM request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Document assembly error: {0}")]
    Assembly(String),
    #[error("Not found")]
    NotFound,
}

impl From<LlmError> for AppError {
    fn from(value: LlmError) -> Self {
        match value {
            LlmError::MissingApiKey => {
                AppError::Configuration("generation service API key is not configured".to_string())
            }
            other => AppError::Upstream(other.to_string()),
        }
    }
}

fn error_body(message: &str) -> Json<serde_json::Value> {
    Json(json!({ "success": false, "error": message }))
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Internal detail stays in the logs; callers get a short message.
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, error_body("Not found")).into_response(),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, error_body(&msg)).into_response()
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("Service is not configured for letter generation"),
                )
                    .into_response()
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream generation failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    error_body("The generation service failed to produce a result"),
                )
                    .into_response()
            }
            AppError::Assembly(msg) => {
                tracing::error!("Document assembly failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("Failed to generate the document"),
                )
                    .into_response()
            }
        }
    }
}
