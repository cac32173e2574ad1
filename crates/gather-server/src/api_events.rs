//! Handlers for the public event feed and authenticated submissions.

use crate::api::{join_error, pool_error, ApiError};
use crate::middleware::{optional_principal, AuthContext};
use crate::AppState;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::HeaderMap,
};
use gather_types::{event_visible, Event, EventDraft, EventFilters, Report, ReportReason};
use serde::Deserialize;
use std::sync::Arc;

/// Handler for `GET /api/events`.
///
/// Returns the approved feed ordered soonest-first, with optional
/// `search`, `location`, and `category` query filters.
pub async fn list_events_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(filters): Query<EventFilters>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_events::list_approved(&conn, &filters).map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(events))
}

/// Handler for `GET /api/events/{id}`.
///
/// Visibility-resolved: approved events are public; a pending or rejected
/// event resolves only for moderators and its own creator, and reads as
/// `404` for everyone else so that existence is not leaked.
pub async fn get_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Event>, ApiError> {
    let viewer = optional_principal(state.clone(), &headers).await?;

    let event = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_events::get_event(&conn, &event_id).map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    match event {
        Some(event) if event_visible(viewer.as_ref(), &event) => Ok(Json(event)),
        _ => Err(ApiError::NotFound("event not found".to_string())),
    }
}

/// Handler for `POST /api/events`.
///
/// Any authenticated role may submit; the listing enters the moderation
/// queue as `pending` and unverified.
pub async fn submit_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Json(draft): Json<EventDraft>,
) -> Result<Json<Event>, ApiError> {
    let event = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_events::submit_event(&conn, &draft, &auth.0.id).map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(event))
}

/// Request body for filing a report.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    /// Why the event is being reported.
    pub reason: ReportReason,
}

/// Handler for `POST /api/events/{id}/report`.
pub async fn report_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(event_id): Path<String>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<Report>, ApiError> {
    let report = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_reports::file_report(&conn, &auth.0.id, &event_id, payload.reason)
            .map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(report))
}
