//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{DiningTable, DiningTableCreate, DiningTableDetail, DiningTableUpdate};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.tables.list().await?;
    Ok(Json(tables))
}

/// GET /api/tables/restaurant/:restaurant_id - 获取餐厅的桌台
pub async fn list_by_restaurant(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.tables.list_by_restaurant(restaurant_id).await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台 (含订座)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTableDetail>> {
    let table = state.tables.get(id).await?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<(StatusCode, Json<DiningTable>)> {
    let table = state.tables.create(payload).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// PUT /api/tables/:id - 更新桌台
///
/// `isAvailable` 必须与订座推导出的状态一致，否则返回 409。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.tables.update(id, payload).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.tables.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
