//! Review API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Review, ReviewCreate, ReviewDetail, ReviewUpdate};

use crate::auth::{CurrentUser, ensure_self_or_admin};
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/reviews - 获取所有评价
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ReviewDetail>>> {
    let reviews = state.reviews.list_all().await?;
    Ok(Json(reviews))
}

/// GET /api/reviews/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReviewDetail>> {
    let review = state.reviews.get(id).await?;
    Ok(Json(review))
}

/// GET /api/reviews/restaurant/:restaurant_id
pub async fn list_by_restaurant(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<i64>,
) -> AppResult<Json<Vec<ReviewDetail>>> {
    let reviews = state.reviews.list_by_restaurant(restaurant_id).await?;
    Ok(Json(reviews))
}

/// POST /api/reviews - 发表评价
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<(StatusCode, Json<Review>)> {
    ensure_self_or_admin(&user, payload.user_id)?;
    let review = state.reviews.create(payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// PUT /api/reviews/:id - 修改评分和内容
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewUpdate>,
) -> AppResult<Json<Review>> {
    let existing = state.reviews.find(id).await?;
    ensure_self_or_admin(&user, existing.user_id)?;

    let review = state.reviews.update(id, payload).await?;
    Ok(Json(review))
}

/// DELETE /api/reviews/:id
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let existing = state.reviews.find(id).await?;
    ensure_self_or_admin(&user, existing.user_id)?;

    state.reviews.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
