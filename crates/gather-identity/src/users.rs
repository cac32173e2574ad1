//! User records and principal resolution.

use gather_types::{Principal, Role};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::IdentityError;

/// Classifies the role for an email address.
///
/// The configured moderator email maps to `Role::Moderator`; every other
/// address maps to `Role::User`. Comparison is case-insensitive, as email
/// local-part case is not significant for this single-address knob.
pub fn classify_role(email: &str, moderator_email: Option<&str>) -> Role {
    match moderator_email {
        Some(m) if m.eq_ignore_ascii_case(email) => Role::Moderator,
        _ => Role::User,
    }
}

/// Registers a user, or returns the existing record for the email.
///
/// Registration is idempotent on email. On a repeat registration the
/// stored role is re-derived from the current moderator-email
/// configuration, so promoting or demoting the configured moderator takes
/// effect on their next sign-in. A stored `admin` tag is preserved as-is.
///
/// # Errors
///
/// Returns `IdentityError::InvalidInput` when the name is empty or the
/// email is not plausibly an address, `IdentityError::Database` on SQL
/// failure.
pub fn register_user(
    conn: &Connection,
    name: &str,
    email: &str,
    moderator_email: Option<&str>,
) -> Result<Principal, IdentityError> {
    let name = name.trim();
    let email = email.trim();

    if name.is_empty() {
        return Err(IdentityError::InvalidInput("name is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(IdentityError::InvalidInput(
            "a valid email address is required".to_string(),
        ));
    }

    let classified = classify_role(email, moderator_email);

    if let Some(existing) = principal_for_email(conn, email)? {
        if existing.role != classified && existing.role != Role::Admin {
            conn.execute(
                "UPDATE users SET role = ?1 WHERE id = ?2",
                params![classified.as_str(), existing.id],
            )?;
            tracing::info!(
                user = %existing.id,
                from = existing.role.as_str(),
                to = classified.as_str(),
                "reclassified user role on sign-in"
            );
            return Ok(Principal {
                role: classified,
                ..existing
            });
        }
        return Ok(existing);
    }

    let id = Uuid::new_v4().to_string();
    let created_at: String = conn.query_row(
        "INSERT INTO users (id, name, email, role, created_at)
         VALUES (?1, ?2, ?3, ?4, datetime('now'))
         RETURNING created_at",
        params![id, name, email, classified.as_str()],
        |row| row.get(0),
    )?;

    tracing::info!(user = %id, role = classified.as_str(), "registered user");

    Ok(Principal {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role: classified,
        created_at,
    })
}

/// Resolves a bearer token to a principal.
///
/// The token is the user id. An unknown token yields
/// `IdentityError::UnknownToken`; callers surface it as an authorization
/// failure, never as a 404.
pub fn principal_for_token(conn: &Connection, token: &str) -> Result<Principal, IdentityError> {
    let row = conn
        .query_row(
            "SELECT id, name, email, role, created_at FROM users WHERE id = ?1",
            [token],
            map_principal,
        )
        .optional()?;

    match row {
        Some(result) => result,
        None => Err(IdentityError::UnknownToken),
    }
}

fn principal_for_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Principal>, IdentityError> {
    conn.query_row(
        "SELECT id, name, email, role, created_at FROM users WHERE email = ?1",
        [email],
        map_principal,
    )
    .optional()?
    .transpose()
}

type PrincipalRow = Result<Principal, IdentityError>;

fn map_principal(row: &rusqlite::Row<'_>) -> rusqlite::Result<PrincipalRow> {
    let role_label: String = row.get(3)?;
    let principal = match role_label.parse::<Role>() {
        Ok(role) => Ok(Principal {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role,
            created_at: row.get(4)?,
        }),
        Err(_) => Err(IdentityError::CorruptRole(role_label)),
    };
    Ok(principal)
}
