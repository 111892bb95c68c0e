//! Entry listing, lookup and writes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use glossa_core::defaults::ENTRIES_PER_PAGE;
use glossa_core::{Entry, RequestContext};

use super::ListResponse;
use crate::error::ApiError;
use crate::session::RequireUser;
use crate::state::AppState;

/// An entry as shown to readers: rendered HTML plus its stars.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryView {
    pub keyword: String,
    pub author_id: i64,
    pub html: String,
    pub stars: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

async fn entry_view(
    state: &AppState,
    ctx: &mut RequestContext,
    entry: Entry,
) -> Result<EntryView, ApiError> {
    // The entry was just read, so a miss can always render from its description.
    let html = state
        .render_cache
        .rendered_html_for(ctx, &entry.keyword, Some(&entry.description))
        .await?
        .unwrap_or_default();
    let stars = state.star_ledger.list_for(&entry.keyword).await?;

    Ok(EntryView {
        keyword: entry.keyword,
        author_id: entry.author_id,
        html,
        stars,
        updated_at: entry.updated_at,
    })
}

#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    pub page: Option<i64>,
}

/// `GET /api/v1/entries?page=N`
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListEntriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1).saturating_mul(ENTRIES_PER_PAGE);

    let entries = state.entries.list(ENTRIES_PER_PAGE, offset).await?;
    let total = state.entries.count().await?;

    let mut ctx = state.request_context();
    let mut views = Vec::with_capacity(entries.len());
    for entry in entries {
        views.push(entry_view(&state, &mut ctx, entry).await?);
    }

    Ok(Json(ListResponse::new(
        views,
        total as usize,
        ENTRIES_PER_PAGE as usize,
        offset as usize,
    )))
}

/// `GET /api/v1/keywords/:keyword`, also served at `/keyword/:keyword` where
/// rendered links point.
pub async fn get_keyword(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .entries
        .get(&keyword)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("keyword '{}'", keyword)))?;

    let mut ctx = state.request_context();
    Ok(Json(entry_view(&state, &mut ctx, entry).await?))
}

#[derive(Debug, Deserialize)]
pub struct SaveKeywordBody {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub description: String,
}

/// `POST /api/v1/keywords`
///
/// 201 when the keyword was created, 200 when an existing entry was
/// overwritten.
pub async fn save_keyword(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<SaveKeywordBody>,
) -> Result<impl IntoResponse, ApiError> {
    let mut ctx = state.request_context();
    let outcome = state
        .entry_service
        .save(&mut ctx, user.id, &body.keyword, &body.description)
        .await?;

    let status = if outcome.inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

/// `DELETE /api/v1/keywords/:keyword`
pub async fn delete_keyword(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(keyword): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.entry_service.delete(&keyword).await?;
    Ok(StatusCode::NO_CONTENT)
}
