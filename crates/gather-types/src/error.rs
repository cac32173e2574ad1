//! The shared moderation error taxonomy.

/// Errors surfaced by the moderation core.
///
/// Each variant maps to one failure class with a distinct caller
/// obligation: validation and permission failures are the caller's fault
/// and never retried; `NotFound` on a moderation target means the item
/// was already handled; transition/state failures cover violated
/// lifecycle preconditions including lost write races; only
/// `StoreUnavailable` is safe to retry with backoff.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    /// Malformed or missing input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The caller's role does not permit the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The referenced id does not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// A lifecycle precondition was violated, including a lost race
    /// against a concurrent moderator.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// The target entity is not in a state that permits the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The external store failed transiently; safe to retry.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ModerationError {
    /// Wraps a transient store failure (pool exhaustion, SQLite busy,
    /// any database-level error) as `StoreUnavailable`.
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
