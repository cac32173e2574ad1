//! Handlers for the moderator dashboard and lifecycle actions.

use crate::api::{join_error, pool_error, ApiError};
use crate::middleware::AuthContext;
use crate::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
};
use gather_reports::ReportedEvent;
use gather_types::{can_moderate, Event, EventFilters, Principal, TransparencyLogEntry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Gate for the moderation surface. The lifecycle manager re-checks the
/// role on every transition; this keeps the listings gated too.
fn require_moderator(auth: &AuthContext) -> Result<Principal, ApiError> {
    if can_moderate(&auth.0) {
        Ok(auth.0.clone())
    } else {
        Err(ApiError::Forbidden(
            "moderator role required".to_string(),
        ))
    }
}

/// The three partitions of the moderation dashboard.
#[derive(Debug, Serialize)]
pub struct ModerationQueue {
    /// Events awaiting review, newest submission first.
    pub pending: Vec<Event>,
    /// Approved events with at least one open report.
    pub reported: Vec<ReportedEvent>,
    /// The live approved feed.
    pub approved: Vec<Event>,
}

/// Handler for `GET /api/moderation/queue`.
pub async fn queue_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ModerationQueue>, ApiError> {
    require_moderator(&auth)?;

    let queue = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        let pending = gather_events::list_pending(&conn).map_err(ApiError::from)?;
        let reported = gather_reports::list_reported_events(&conn).map_err(ApiError::from)?;
        let approved = gather_events::list_approved(&conn, &EventFilters::default())
            .map_err(ApiError::from)?;
        Ok::<_, ApiError>(ModerationQueue {
            pending,
            reported,
            approved,
        })
    })
    .await
    .map_err(join_error)??;

    Ok(Json(queue))
}

/// Handler for `GET /api/moderation/pending`.
pub async fn pending_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Event>>, ApiError> {
    require_moderator(&auth)?;

    let events = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_events::list_pending(&conn).map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(events))
}

/// Handler for `GET /api/moderation/reported`.
pub async fn reported_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ReportedEvent>>, ApiError> {
    require_moderator(&auth)?;

    let reported = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_reports::list_reported_events(&conn).map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(reported))
}

/// Request body for approving an event.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    /// Whether to mark the listing as verified while approving.
    #[serde(default)]
    pub verified: bool,
}

/// Handler for `POST /api/events/{id}/approve`.
pub async fn approve_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(event_id): Path<String>,
    Json(payload): Json<ApproveRequest>,
) -> Result<Json<Event>, ApiError> {
    let moderator = require_moderator(&auth)?;

    let event = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_events::approve_event(&conn, &moderator, &event_id, payload.verified)
            .map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(event))
}

/// Request body carrying a moderation reason.
#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    /// Free-text reason; required, recorded in the transparency log.
    pub reason: String,
}

/// Handler for `POST /api/events/{id}/reject`.
pub async fn reject_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(event_id): Path<String>,
    Json(payload): Json<ReasonRequest>,
) -> Result<Json<TransparencyLogEntry>, ApiError> {
    let moderator = require_moderator(&auth)?;

    let entry = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_events::reject_event(&conn, &moderator, &event_id, &payload.reason)
            .map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(entry))
}

/// Response body for a removal.
#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    /// The transparency entry recorded for the removal.
    #[serde(rename = "logEntry")]
    pub log_entry: TransparencyLogEntry,
    /// How many open reports were cleared, when the cleanup succeeded.
    #[serde(rename = "reportsDeleted", skip_serializing_if = "Option::is_none")]
    pub reports_deleted: Option<usize>,
}

/// Handler for `DELETE /api/events/{id}`.
pub async fn remove_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(event_id): Path<String>,
    Json(payload): Json<ReasonRequest>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let moderator = require_moderator(&auth)?;

    let outcome = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_events::remove_event(&conn, &moderator, &event_id, &payload.reason)
            .map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(RemoveResponse {
        log_entry: outcome.log_entry,
        reports_deleted: outcome.reports_deleted,
    }))
}

/// Handler for `DELETE /api/reports/{id}` — dismiss a single report.
pub async fn dismiss_report_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(report_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_moderator(&auth)?;

    tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_reports::dismiss_report(&conn, &report_id).map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(StatusCode::NO_CONTENT)
}
