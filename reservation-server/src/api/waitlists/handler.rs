//! Waitlist API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Waitlist, WaitlistCreate};

use crate::auth::{CurrentUser, ensure_self_or_admin};
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/waitlists - 获取所有候位
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Waitlist>>> {
    let entries = state.waitlists.list().await?;
    Ok(Json(entries))
}

/// GET /api/waitlists/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Waitlist>> {
    let entry = state.waitlists.get(id).await?;
    Ok(Json(entry))
}

/// GET /api/waitlists/by-user/:user_id
pub async fn list_by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Waitlist>>> {
    let entries = state.waitlists.list_by_user(user_id).await?;
    Ok(Json(entries))
}

/// GET /api/waitlists/by-table/:table_id
pub async fn list_by_table(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<Json<Vec<Waitlist>>> {
    let entries = state.waitlists.list_by_table(table_id).await?;
    Ok(Json(entries))
}

/// POST /api/waitlists - 加入候位
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<WaitlistCreate>,
) -> AppResult<(StatusCode, Json<Waitlist>)> {
    ensure_self_or_admin(&user, payload.user_id)?;
    let entry = state.waitlists.create(payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/waitlists/:id - 离开候位
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let existing = state.waitlists.get(id).await?;
    ensure_self_or_admin(&user, existing.user_id)?;

    state.waitlists.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
