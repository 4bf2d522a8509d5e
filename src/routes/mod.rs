//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket course builder at `/ws`
/// - catalog, browse, admin CRUD and course endpoints under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    api_router(state).fallback_service(static_service)
}

/// API and WebSocket routes without the static fallback.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // Catalog
        .route("/api/v1/health", get(http::http_health))
        .route(
            "/api/v1/catalog",
            get(http::http_get_catalog).put(http::http_put_catalog),
        )
        .route("/api/v1/catalog/reload", post(http::http_reload_catalog))
        // Browse + admin CRUD
        .route(
            "/api/v1/lessons",
            get(http::http_browse_lessons).post(http::http_create_lesson),
        )
        .route(
            "/api/v1/lessons/:id",
            get(http::http_get_lesson)
                .put(http::http_update_lesson)
                .delete(http::http_delete_lesson),
        )
        // Course assembly
        .route("/api/v1/course/assemble", post(http::http_assemble_course))
        .route("/api/v1/course/describe", post(http::http_describe_course))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
