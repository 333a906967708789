use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::CredentialError;
use crate::services::pipeline::PipelineError;

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Please provide at least one input image")]
    NoInputImages,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Remote service not configured: {0}")]
    NotConfigured(#[from] CredentialError),

    #[error("Failed to enhance image: {0}")]
    EnhancementFailed(String),

    #[error("Failed to generate image: {0}")]
    GenerationFailed(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoInputImage => Self::NoInputImages,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NoInputImages => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Please provide at least one input image" }),
            ),
            Self::InvalidRequest(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request", "details": details }),
            ),
            Self::NotConfigured(err) => {
                tracing::error!(error = %err, "Remote service credential unusable");
                let error = match err {
                    CredentialError::Missing => {
                        "Enhancement service is not configured. Please contact support."
                    }
                    CredentialError::InvalidFormat => "Enhancement service configuration error",
                };
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": error, "details": err.to_string() }),
                )
            }
            Self::EnhancementFailed(details) => internal("Failed to enhance image", details),
            Self::GenerationFailed(details) => internal("Failed to generate image", details),
        };

        (status, Json(body)).into_response()
    }
}

fn internal(error: &str, details: &str) -> (StatusCode, serde_json::Value) {
    tracing::error!(error, details, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "error": error,
            "details": details,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn credential_errors_map_to_503_without_secrets() {
        let (status, body) = body_of(CredentialError::InvalidFormat.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Enhancement service configuration error");
        assert_eq!(body["details"], "Invalid token format");
    }

    #[tokio::test]
    async fn internal_errors_carry_timestamp() {
        let (status, body) = body_of(ApiError::EnhancementFailed("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to enhance image");
        assert_eq!(body["details"], "boom");
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }
}
