//! Persistence operations for the transparency log.
//!
//! All writes go through [`record`], which assigns a server timestamp
//! and inserts in a single statement. Reads go through
//! [`log_for_viewer`], which applies the visibility rules in SQL.

use gather_types::{
    can_moderate, LogAction, ModerationError, Principal, TransparencyLogEntry,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Appends one immutable entry to the transparency log.
///
/// Called exactly once per rejection and once per removal, inside the
/// same transaction as the lifecycle write so the entry can never be
/// lost. Never called for approvals.
///
/// # Errors
///
/// Returns `ModerationError::StoreUnavailable` on database failure.
pub fn record(
    conn: &Connection,
    event_id: &str,
    action: LogAction,
    reason: &str,
    moderator_id: &str,
) -> Result<TransparencyLogEntry, ModerationError> {
    let id = Uuid::new_v4().to_string();
    let created_at: String = conn
        .query_row(
            "INSERT INTO transparency_log (id, event_id, action, reason, moderator_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
             RETURNING created_at",
            params![id, event_id, action.as_str(), reason, moderator_id],
            |row| row.get(0),
        )
        .map_err(ModerationError::store)?;

    tracing::info!(
        entry = %id,
        event = %event_id,
        action = action.as_str(),
        moderator = %moderator_id,
        "transparency entry recorded"
    );

    Ok(TransparencyLogEntry {
        id,
        event_id: event_id.to_string(),
        action,
        reason: reason.to_string(),
        moderator_id: moderator_id.to_string(),
        created_at,
    })
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<TransparencyLogEntry> {
    let action_label: String = row.get(2)?;
    let action: LogAction = action_label
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(TransparencyLogEntry {
        id: row.get(0)?,
        event_id: row.get(1)?,
        action,
        reason: row.get(3)?,
        moderator_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Returns the transparency log as visible to the given viewer, newest
/// entry first.
///
/// Moderators see every entry. A regular user sees an entry only when
/// its target event still exists and they created it — the inner join
/// on `events` makes an entry with a deleted target unresolvable, which
/// excludes it. Anonymous viewers get an empty log without touching the
/// database.
///
/// # Errors
///
/// Returns `ModerationError::StoreUnavailable` on database failure.
pub fn log_for_viewer(
    conn: &Connection,
    viewer: Option<&Principal>,
) -> Result<Vec<TransparencyLogEntry>, ModerationError> {
    let viewer = match viewer {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };

    let mut entries = Vec::new();

    if can_moderate(viewer) {
        let mut stmt = conn
            .prepare(
                "SELECT id, event_id, action, reason, moderator_id, created_at
                 FROM transparency_log
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(ModerationError::store)?;
        let rows = stmt.query_map([], map_entry).map_err(ModerationError::store)?;
        for row in rows {
            entries.push(row.map_err(ModerationError::store)?);
        }
    } else {
        let mut stmt = conn
            .prepare(
                "SELECT t.id, t.event_id, t.action, t.reason, t.moderator_id, t.created_at
                 FROM transparency_log t
                 JOIN events e ON e.id = t.event_id
                 WHERE e.created_by = ?1
                 ORDER BY t.created_at DESC, t.id DESC",
            )
            .map_err(ModerationError::store)?;
        let rows = stmt
            .query_map([&viewer.id], map_entry)
            .map_err(ModerationError::store)?;
        for row in rows {
            entries.push(row.map_err(ModerationError::store)?);
        }
    }

    Ok(entries)
}
