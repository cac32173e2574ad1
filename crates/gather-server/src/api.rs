//! API error type and the auth handlers.

use crate::middleware::AuthContext;
use crate::AppState;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gather_identity::IdentityError;
use gather_types::{ModerationError, Principal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        let msg = err.to_string();
        match err {
            ModerationError::Validation(_) => ApiError::BadRequest(msg),
            ModerationError::PermissionDenied(_) => ApiError::Forbidden(msg),
            ModerationError::NotFound(_) => ApiError::NotFound(msg),
            ModerationError::InvalidTransition(_) | ModerationError::InvalidState(_) => {
                ApiError::Conflict(msg)
            }
            ModerationError::StoreUnavailable(_) => ApiError::ServiceUnavailable(msg),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        let msg = err.to_string();
        match err {
            IdentityError::InvalidInput(_) => ApiError::BadRequest(msg),
            IdentityError::UnknownToken => ApiError::Unauthorized(msg),
            IdentityError::Database(_) => ApiError::ServiceUnavailable(msg),
            IdentityError::CorruptRole(_) => ApiError::InternalServerError(msg),
        }
    }
}

/// Wraps a `spawn_blocking` join failure.
pub(crate) fn join_error(err: tokio::task::JoinError) -> ApiError {
    ApiError::InternalServerError(format!("task join error: {err}"))
}

/// Maps a pool checkout failure. Pool exhaustion is transient.
pub(crate) fn pool_error(err: r2d2::Error) -> ApiError {
    ApiError::ServiceUnavailable(format!("db connection failed: {err}"))
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address; determines the assigned role.
    pub email: String,
}

/// Response body for successful registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// The registered (or pre-existing) principal.
    pub user: Principal,
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Handler for `POST /api/auth/register`.
///
/// Registration is idempotent on email: re-registering returns the
/// existing principal and the same token.
pub async fn register_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let principal = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_identity::register_user(
            &conn,
            &payload.name,
            &payload.email,
            state.moderator_email.as_deref(),
        )
        .map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    let token = principal.id.clone();
    Ok(Json(RegisterResponse {
        user: principal,
        token,
    }))
}

/// Handler for `GET /api/auth/me`.
pub async fn me_handler(Extension(auth): Extension<AuthContext>) -> Json<Principal> {
    Json(auth.0)
}
