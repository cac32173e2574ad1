//! Error types for the identity boundary.

/// Errors that can occur during identity operations.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// A database operation failed.
    #[error("identity database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A registration field was missing or malformed.
    #[error("invalid identity input: {0}")]
    InvalidInput(String),

    /// The bearer token does not resolve to a known user.
    #[error("unknown bearer token")]
    UnknownToken,

    /// A stored role label could not be parsed.
    #[error("corrupt role label in users table: {0}")]
    CorruptRole(String),
}
