use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use garde::Validate;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::enhancement::{EnhancementRequest, EnhancementResponse};
use crate::routes::error::ApiError;

/// POST /api/enhance — Turn the first input image into a polished headshot.
///
/// Input is checked before the credential, and both before any remote call.
/// The pipeline runs on its own task so a panic inside it becomes a 500.
pub async fn enhance_image(
    State(state): State<AppState>,
    payload: Result<Json<EnhancementRequest>, JsonRejection>,
) -> Result<Json<EnhancementResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    if request.input_images.is_empty() {
        return Err(ApiError::NoInputImages);
    }
    request
        .validate()
        .map_err(|report| ApiError::InvalidRequest(report.to_string()))?;

    let pipeline = Arc::clone(&state.remote()?.pipeline);

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("enhance", %request_id);

    let result = tokio::spawn(async move { pipeline.run(request).await }.instrument(span))
        .await
        .map_err(|e| ApiError::EnhancementFailed(e.to_string()))??;

    Ok(Json(result.into()))
}
