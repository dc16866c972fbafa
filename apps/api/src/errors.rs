use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::document::DocumentError;
use crate::llm_client::InferenceError;
use crate::prompt::PromptError;

pub const INVALID_ACTION_MESSAGE: &str =
    "Invalid action: 'regenerate' requires both 'feedback' and 'previous_response'";
pub const UPSTREAM_FETCH_MESSAGE: &str = "Failed to fetch user data";
pub const INFERENCE_MESSAGE: &str = "An error occurred while generating the response.";
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid document content: {0}")]
    InvalidDocument(String),

    #[error("Invalid action")]
    InvalidAction,

    #[error("User data fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        AppError::InvalidDocument(e.to_string())
    }
}

impl From<PromptError> for AppError {
    fn from(e: PromptError) -> Self {
        AppError::Internal(e.into())
    }
}

impl AppError {
    /// Status, machine-readable code and caller-facing message. Server-side
    /// failures are logged here and reported with a generic message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidDocument(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_DOCUMENT",
                format!("Invalid document content: {msg}"),
            ),
            AppError::InvalidAction => (
                StatusCode::BAD_REQUEST,
                "INVALID_ACTION",
                INVALID_ACTION_MESSAGE.to_string(),
            ),
            AppError::UpstreamFetch(msg) => {
                tracing::error!("Error fetching user data: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_FETCH_ERROR",
                    UPSTREAM_FETCH_MESSAGE.to_string(),
                )
            }
            AppError::Inference(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    INFERENCE_MESSAGE.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        }
    }

    /// Status code and JSON error body, as returned to callers.
    pub fn into_status_and_body(self) -> (StatusCode, Value) {
        let (status, code, message) = self.parts();
        let body = json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        (status, body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_status_and_body();
        (status, Json(body)).into_response()
    }
}
