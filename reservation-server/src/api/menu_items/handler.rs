//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/menuitems - 获取所有菜品
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let items = state.menu_items.list().await?;
    Ok(Json(items))
}

/// GET /api/menuitems/restaurant/:restaurant_id - 获取餐厅菜单
pub async fn list_by_restaurant(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = state.menu_items.list_by_restaurant(restaurant_id).await?;
    Ok(Json(items))
}

/// GET /api/menuitems/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let item = state.menu_items.get(id).await?;
    Ok(Json(item))
}

/// POST /api/menuitems - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    let item = state.menu_items.create(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menuitems/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let item = state.menu_items.update(id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/menuitems/:id - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.menu_items.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
