//! Handler for the public transparency log.

use crate::api::{join_error, pool_error, ApiError};
use crate::middleware::optional_principal;
use crate::AppState;
use axum::{
    extract::{Extension, Json},
    http::HeaderMap,
};
use gather_types::TransparencyLogEntry;
use std::sync::Arc;

/// Handler for `GET /api/transparency`.
///
/// The route is public but the response is viewer-filtered: moderators
/// see every entry, a user sees entries for their own events, and an
/// anonymous viewer gets an empty list.
pub async fn transparency_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<TransparencyLogEntry>>, ApiError> {
    let viewer = optional_principal(state.clone(), &headers).await?;

    let entries = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_transparency::log_for_viewer(&conn, viewer.as_ref()).map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(entries))
}
