//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update_status)
                .delete(handler::delete),
        )
        .route("/table/{table_id}", get(handler::list_by_table))
        .route("/byReservation/{reservation_id}", get(handler::list_by_reservation))
        .route("/byUser/{user_id}", get(handler::list_by_user))
        // Order items
        .route("/{id}/items", axum::routing::post(handler::add_item))
        .route(
            "/{id}/items/{item_id}",
            put(handler::update_item).delete(handler::remove_item),
        )
}
