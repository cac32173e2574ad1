//! Bearer-token authentication middleware.

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use gather_types::Principal;
use std::sync::Arc;

use crate::api::{join_error, pool_error, ApiError};
use crate::AppState;

/// Wrapper for the authenticated [`Principal`], stored in request
/// extensions by [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthContext(pub Principal);

/// Extracts the bearer token from the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Middleware to authenticate requests via `Authorization: Bearer`.
///
/// In the current phase the bearer token IS the user id issued at
/// registration. There is no per-request signature verification; session
/// hardening belongs to the external identity provider.
pub async fn auth_middleware(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let token = bearer_token(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    let state = req
        .extensions()
        .get::<Arc<AppState>>()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
        .clone();

    // Any resolution failure (including "not found") reads as Unauthorized.
    let principal = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        gather_identity::principal_for_token(&conn, &token).map_err(|_| StatusCode::UNAUTHORIZED)
    })
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)??;

    req.extensions_mut().insert(AuthContext(principal));

    Ok(next.run(req).await)
}

/// Resolves an optional viewer for public endpoints that personalize
/// their response (the feed detail view and the transparency log).
///
/// No header means an anonymous viewer; a header with an unknown token is
/// rejected rather than silently downgraded to anonymous.
pub async fn optional_principal(
    state: Arc<AppState>,
    headers: &HeaderMap,
) -> Result<Option<Principal>, ApiError> {
    let token = match bearer_token(headers) {
        Some(token) => token,
        None => return Ok(None),
    };

    let principal = tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(pool_error)?;
        gather_identity::principal_for_token(&conn, &token).map_err(ApiError::from)
    })
    .await
    .map_err(join_error)??;

    Ok(Some(principal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert("Authorization", HeaderValue::from_static("Bearer abc-123"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc-123"));

        headers.insert("Authorization", HeaderValue::from_static("Basic abc-123"));
        assert!(bearer_token(&headers).is_none());

        headers.insert("Authorization", HeaderValue::from_static("Bearer   "));
        assert!(bearer_token(&headers).is_none());
    }
}
