//! Registration and session endpoints.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/v1/register`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.accounts.register(&body.name, &body.password).await?;
    let cookie = state.sessions.login_cookie(id)?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "id": id, "name": body.name })),
    ))
}

/// `POST /api/v1/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.login(&body.name, &body.password).await?;
    let cookie = state.sessions.login_cookie(user.id)?;

    Ok(([(header::SET_COOKIE, cookie)], Json(user)))
}

/// `POST /api/v1/logout`
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, state.sessions.logout_cookie())],
    )
}
