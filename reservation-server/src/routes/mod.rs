//! 路由组装
//!
//! [`build_router`] 注册所有 API 路由；[`build_app`] 在其上叠加中间件，
//! HTTP 服务器和集成测试共用同一套组装逻辑。

pub mod middleware;

use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::auth::require_auth;
use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(api::health::router())
        // Account API - register/login public, rest authenticated
        .merge(api::account::router())
        .merge(api::restaurants::router())
        .merge(api::tables::router())
        .merge(api::menu_items::router())
        .merge(api::reservations::router())
        .merge(api::orders::router())
        .merge(api::reviews::router())
        .merge(api::waitlists::router())
}

/// Build a fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let request_id = HeaderName::from_static("x-request-id");

    build_router()
        // Get user context (JWT authentication) - injects CurrentUser before handlers run
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        // Timeout - abort slow requests
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_millis(state.config.request_timeout_ms),
        ))
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Request logging
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        // Trace - Request tracing
        .layer(TraceLayer::new_for_http())
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        // Request ID - outermost, so every inner layer sees it
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
}
