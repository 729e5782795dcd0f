//! Table Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{TableReservation, TableReservationCreate, TableReservationUpdate};

use crate::auth::{CurrentUser, ensure_self_or_admin};
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/tablereservations - 获取所有订座
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TableReservation>>> {
    let reservations = state.reservations.list_all().await?;
    Ok(Json(reservations))
}

/// GET /api/tablereservations/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TableReservation>> {
    let reservation = state.reservations.get(id).await?;
    Ok(Json(reservation))
}

/// GET /api/tablereservations/byUser/:user_id
pub async fn list_by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<TableReservation>>> {
    let reservations = state.reservations.list_by_user(user_id).await?;
    Ok(Json(reservations))
}

/// GET /api/tablereservations/byTable/:table_id
pub async fn list_by_table(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<Json<Vec<TableReservation>>> {
    let reservations = state.reservations.list_by_table(table_id).await?;
    Ok(Json(reservations))
}

/// GET /api/tablereservations/byRestaurant/:restaurant_id
pub async fn list_by_restaurant(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<Vec<TableReservation>>> {
    let reservations = state.reservations.list_by_restaurant(restaurant_id).await?;
    Ok(Json(reservations))
}

/// POST /api/tablereservations - 订座 (桌台被占用返回 409)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TableReservationCreate>,
) -> AppResult<(StatusCode, Json<TableReservation>)> {
    ensure_self_or_admin(&user, payload.user_id)?;
    let reservation = state.reservations.create(payload).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// PUT /api/tablereservations/:id - 整体替换订座
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<TableReservationUpdate>,
) -> AppResult<Json<TableReservation>> {
    let existing = state.reservations.get(id).await?;
    ensure_self_or_admin(&user, existing.user_id)?;
    ensure_self_or_admin(&user, payload.user_id)?;

    let reservation = state.reservations.update(id, payload).await?;
    Ok(Json(reservation))
}

/// DELETE /api/tablereservations/:id - 取消订座并释放桌台
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let existing = state.reservations.get(id).await?;
    ensure_self_or_admin(&user, existing.user_id)?;

    state.reservations.cancel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
