//! Star endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use glossa_core::Star;

use crate::error::ApiError;
use crate::session::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddStarBody {
    #[serde(default)]
    pub keyword: String,
    /// Defaults to the logged-in user's name.
    pub user: Option<String>,
}

/// `POST /api/v1/stars`
pub async fn add_star(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(body): Json<AddStarBody>,
) -> Result<impl IntoResponse, ApiError> {
    let user_name = body
        .user
        .filter(|u| !u.is_empty())
        .or_else(|| current.map(|u| u.name))
        .ok_or_else(|| ApiError::BadRequest("user must not be empty".to_string()))?;

    if !state.entries.exists(&body.keyword).await? {
        return Err(ApiError::NotFound(format!("keyword '{}'", body.keyword)));
    }

    state.star_ledger.append(&body.keyword, &user_name).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "result": "ok" })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListStarsQuery {
    pub keyword: String,
}

/// `GET /api/v1/stars?keyword=`
pub async fn list_stars(
    State(state): State<AppState>,
    Query(query): Query<ListStarsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let stars: Vec<Star> = state
        .star_ledger
        .list_for(&query.keyword)
        .await?
        .into_iter()
        .map(|user_name| Star {
            keyword: query.keyword.clone(),
            user_name,
        })
        .collect();

    Ok(Json(serde_json::json!({ "result": stars })))
}
