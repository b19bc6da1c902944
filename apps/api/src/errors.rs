use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::DispatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Generation error: {0}")]
    Generation(#[from] DispatchError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Generation(e) => generation_error_parts(e),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn generation_error_parts(error: &DispatchError) -> (StatusCode, &'static str, String) {
    match error {
        DispatchError::PoolExhausted { attempts } => {
            tracing::warn!("Generation pool exhausted after {attempts} attempts");
            (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "The AI service is rate limited. Please try again later.".to_string(),
            )
        }
        DispatchError::Configuration => {
            tracing::error!("Generation requested but no API credentials are configured");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "GENERATION_MISCONFIGURED",
                "The AI service is not configured".to_string(),
            )
        }
        DispatchError::EmptyPrompt => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            error.to_string(),
        ),
        DispatchError::Service { .. } | DispatchError::Llm(_) => {
            tracing::error!("LLM error: {error}");
            (
                StatusCode::BAD_GATEWAY,
                "LLM_ERROR",
                "An AI processing error occurred".to_string(),
            )
        }
    }
}
