//! Administrative reset.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /initialize`
pub async fn initialize(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state
        .entry_service
        .reset(state.config.seed_boundary)
        .await?;
    Ok(Json(serde_json::json!({ "result": "ok" })))
}
