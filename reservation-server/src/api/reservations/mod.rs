//! Table Reservation API 模块
//!
//! 订座的创建/取消会同步桌台可用状态。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tablereservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/byUser/{user_id}", get(handler::list_by_user))
        .route("/byTable/{table_id}", get(handler::list_by_table))
        .route("/byRestaurant/{restaurant_id}", get(handler::list_by_restaurant))
}
