use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::generate::{GenerateRequest, GenerateResponse};
use crate::routes::error::ApiError;

/// POST /api/generate — Generate a headshot from a text prompt.
pub async fn generate_headshot(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let generator = Arc::clone(&state.remote()?.generator);

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate", %request_id);

    let image = tokio::spawn(
        async move { generator.generate(request.resolved_prompt()).await }.instrument(span),
    )
    .await
    .map_err(|e| ApiError::GenerationFailed(e.to_string()))?
    .map_err(|e| ApiError::GenerationFailed(e.to_string()))?;

    Ok(Json(GenerateResponse { image }))
}
