//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Restaurant, RestaurantCreate, RestaurantDetail, RestaurantUpdate};

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/restaurants - 获取所有餐厅
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = state.restaurants.list().await?;
    Ok(Json(restaurants))
}

/// GET /api/restaurants/:id - 获取餐厅 (含桌台)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RestaurantDetail>> {
    let restaurant = state.restaurants.get(id).await?;
    Ok(Json(restaurant))
}

/// POST /api/restaurants - 创建餐厅
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    let restaurant = state.restaurants.create(payload).await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// PUT /api/restaurants/:id - 更新餐厅
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = state.restaurants.update(id, payload).await?;
    Ok(Json(restaurant))
}

/// DELETE /api/restaurants/:id - 删除餐厅
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.restaurants.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
