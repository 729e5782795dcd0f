//! Account API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UserIdResponse,
    UserProfile,
};

use crate::auth::{CurrentUser, ensure_self_or_admin};
use crate::core::ServerState;
use crate::utils::AppResult;

/// 登录固定延迟 (毫秒)，成功与失败耗时一致
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/account/register - 注册普通用户
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.accounts.register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/account/login - 用户登录
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let result = state.accounts.login(req).await;

    // 固定延迟，防止通过时序判断用户名是否存在
    tokio::time::sleep(std::time::Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    Ok(Json(result?))
}

/// GET /api/account/me - 当前用户信息
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let profile = state.accounts.profile(user.id).await?;
    Ok(Json(profile))
}

/// GET /api/account/getUserIdByUsername/:username - 按用户名查用户 ID
pub async fn get_user_id_by_username(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserIdResponse>> {
    let user_id = state.accounts.find_user_id(&username).await?;
    Ok(Json(UserIdResponse { user_id }))
}

/// GET /api/account/getUserDetails/:user_id - 用户详情
pub async fn get_user_details(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserProfile>> {
    let profile = state.accounts.profile(user_id).await?;
    Ok(Json(profile))
}

/// POST /api/account/changePasswordByUserId - 修改密码 (本人或管理员)
pub async fn change_password(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    ensure_self_or_admin(&user, req.user_id)?;
    state.accounts.change_password(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/account/deleteUser/:user_id - 删除用户及其关联数据 (本人或管理员)
pub async fn delete_user(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<StatusCode> {
    ensure_self_or_admin(&user, user_id)?;
    state.accounts.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
