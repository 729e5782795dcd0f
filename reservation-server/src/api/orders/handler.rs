//! Order API Handlers
//!
//! 写操作仅限订单所属用户或管理员。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    Order, OrderCreate, OrderDetail, OrderItemCreate, OrderItemUpdate, OrderStatusUpdate,
};

use crate::auth::{CurrentUser, ensure_self_or_admin};
use crate::core::ServerState;
use crate::utils::AppResult;

/// 加载订单并检查归属
async fn owned_order(state: &ServerState, user: &CurrentUser, id: i64) -> AppResult<OrderDetail> {
    let detail = state.orders.get(id).await?;
    ensure_self_or_admin(user, detail.order.user_id)?;
    Ok(detail)
}

/// GET /api/orders - 获取所有订单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_all().await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取订单 (含明细)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let order = state.orders.get(id).await?;
    Ok(Json(order))
}

/// GET /api/orders/table/:table_id
pub async fn list_by_table(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_by_table(table_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/byReservation/:reservation_id
pub async fn list_by_reservation(
    State(state): State<ServerState>,
    Path(reservation_id): Path<i64>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_by_reservation(reservation_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/byUser/:user_id
pub async fn list_by_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_by_user(user_id).await?;
    Ok(Json(orders))
}

/// POST /api/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    ensure_self_or_admin(&user, payload.user_id)?;
    let order = state.orders.create(payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /api/orders/:id - 更新订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    owned_order(&state, &user, id).await?;
    let order = state.orders.update_status(id, &payload.order_status).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id - 删除订单及明细
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    owned_order(&state, &user, id).await?;
    state.orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/orders/:id/items - 添加菜品
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderItemCreate>,
) -> AppResult<(StatusCode, Json<OrderDetail>)> {
    owned_order(&state, &user, id).await?;
    let detail = state.orders.add_item(id, payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /api/orders/:id/items/:item_id - 修改数量
pub async fn update_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, item_id)): Path<(i64, i64)>,
    Json(payload): Json<OrderItemUpdate>,
) -> AppResult<Json<OrderDetail>> {
    owned_order(&state, &user, id).await?;
    let detail = state.orders.update_item(id, item_id, payload).await?;
    Ok(Json(detail))
}

/// DELETE /api/orders/:id/items/:item_id - 移除菜品
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, item_id)): Path<(i64, i64)>,
) -> AppResult<Json<OrderDetail>> {
    owned_order(&state, &user, id).await?;
    let detail = state.orders.remove_item(id, item_id).await?;
    Ok(Json(detail))
}
