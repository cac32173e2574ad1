//! Gather server library logic.

pub mod api;
pub mod api_events;
pub mod api_moderation;
pub mod api_transparency;
pub mod config;
pub mod middleware;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use gather_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Email that classifies a registering user as a moderator.
    pub moderator_email: Option<String>,
}

/// Maximum request body size (256 KiB). Listings are small; anything
/// larger is not a legitimate submission.
const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/events", post(api_events::submit_event_handler))
        .route(
            "/api/events/{eventId}/report",
            post(api_events::report_event_handler),
        )
        .route("/api/auth/me", get(api::me_handler))
        .route(
            "/api/moderation/queue",
            get(api_moderation::queue_handler),
        )
        .route(
            "/api/moderation/pending",
            get(api_moderation::pending_handler),
        )
        .route(
            "/api/moderation/reported",
            get(api_moderation::reported_handler),
        )
        .route(
            "/api/events/{eventId}/approve",
            post(api_moderation::approve_handler),
        )
        .route(
            "/api/events/{eventId}/reject",
            post(api_moderation::reject_handler),
        )
        .route(
            "/api/events/{eventId}",
            delete(api_moderation::remove_handler),
        )
        .route(
            "/api/reports/{reportId}",
            delete(api_moderation::dismiss_report_handler),
        )
        .layer(axum::middleware::from_fn(middleware::auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/api/events", get(api_events::list_events_handler))
        .route("/api/events/{eventId}", get(api_events::get_event_handler))
        .route(
            "/api/transparency",
            get(api_transparency::transparency_handler),
        )
        .route("/api/auth/register", post(api::register_handler))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
