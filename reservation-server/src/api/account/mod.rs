//! 账户 API 模块
//!
//! `register` 与 `login` 为公共路由，其余接口需要登录。

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/account", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
        .route("/getUserIdByUsername/{username}", get(handler::get_user_id_by_username))
        .route("/getUserDetails/{user_id}", get(handler::get_user_details))
        .route("/changePasswordByUserId", post(handler::change_password))
        .route("/deleteUser/{user_id}", delete(handler::delete_user))
}
