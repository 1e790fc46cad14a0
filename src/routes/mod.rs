//! HTTP route handlers.
//!
//! Both routes accept any method and carry `Cache-Control: no-store`.
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod hello;
pub mod ping;

use axum::{middleware, routing::any, Router};
use axum::http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with both routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/hello", any(hello::hello))
        .route("/ping", any(ping::ping))
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
