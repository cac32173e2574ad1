//! Persistence operations for reports.

use gather_types::{
    Event, EventCategory, EventStatus, Location, ModerationError, Report, ReportReason,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use uuid::Uuid;

/// An event joined with the open reports filed against it.
#[derive(Debug, Clone, Serialize)]
pub struct ReportedEvent {
    /// The reported event.
    pub event: Event,
    /// All open reports against it, newest first.
    pub reports: Vec<Report>,
}

/// Files a report against an approved event.
///
/// The target must currently be `approved`: reporting a non-public event
/// is rejected. No (reporter, event) uniqueness is enforced.
///
/// # Errors
///
/// `NotFound` when the event does not exist, `InvalidState` when it is
/// not approved, `StoreUnavailable` on database failure.
pub fn file_report(
    conn: &Connection,
    reporter_id: &str,
    event_id: &str,
    reason: ReportReason,
) -> Result<Report, ModerationError> {
    let status: Option<String> = conn
        .query_row(
            "SELECT status FROM events WHERE id = ?1",
            [event_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(ModerationError::store)?;

    match status.as_deref() {
        None => {
            return Err(ModerationError::NotFound(format!(
                "event {event_id} does not exist"
            )))
        }
        Some("approved") => {}
        Some(other) => {
            return Err(ModerationError::InvalidState(format!(
                "cannot report event {event_id}: status is '{other}', only approved events are reportable"
            )))
        }
    }

    let id = Uuid::new_v4().to_string();
    let created_at: String = conn
        .query_row(
            "INSERT INTO reports (id, event_id, reported_by, reason, created_at)
             VALUES (?1, ?2, ?3, ?4, datetime('now'))
             RETURNING created_at",
            params![id, event_id, reporter_id, reason.as_str()],
            |row| row.get(0),
        )
        .map_err(ModerationError::store)?;

    tracing::info!(
        report = %id,
        event = %event_id,
        reason = reason.as_str(),
        "report filed"
    );

    Ok(Report {
        id,
        event_id: event_id.to_string(),
        reported_by: reporter_id.to_string(),
        reason,
        created_at,
    })
}

/// Groups all open reports by event and joins each group with its event.
///
/// Results are ordered by event id; events with zero reports never
/// appear, and reports whose event has vanished between writes are
/// skipped (the cascade reconciles them).
///
/// # Errors
///
/// Returns `ModerationError::StoreUnavailable` on database failure.
pub fn list_reported_events(conn: &Connection) -> Result<Vec<ReportedEvent>, ModerationError> {
    let mut stmt = conn
        .prepare(
            "SELECT e.id, e.title, e.description, e.date, e.city, e.country,
                    e.category, e.source_link, e.organizer, e.status, e.verified,
                    e.created_by, e.created_at,
                    r.id, r.reported_by, r.reason, r.created_at
             FROM reports r
             JOIN events e ON e.id = r.event_id
             ORDER BY e.id ASC, r.created_at DESC, r.id ASC",
        )
        .map_err(ModerationError::store)?;

    let rows = stmt
        .query_map([], |row| {
            let event = map_joined_event(row)?;
            let report = Report {
                id: row.get(13)?,
                event_id: event.id.clone(),
                reported_by: row.get(14)?,
                reason: parse_reason(row, 15)?,
                created_at: row.get(16)?,
            };
            Ok((event, report))
        })
        .map_err(ModerationError::store)?;

    let mut grouped: Vec<ReportedEvent> = Vec::new();
    for row in rows {
        let (event, report) = row.map_err(ModerationError::store)?;
        match grouped.last_mut() {
            Some(last) if last.event.id == event.id => last.reports.push(report),
            _ => grouped.push(ReportedEvent {
                event,
                reports: vec![report],
            }),
        }
    }

    Ok(grouped)
}

fn map_joined_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    let category_label: String = row.get(6)?;
    let category: EventCategory = category_label
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    let status_label: String = row.get(9)?;
    let status: EventStatus = status_label
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        location: Location {
            city: row.get(4)?,
            country: row.get(5)?,
        },
        category,
        source_link: row.get(7)?,
        organizer: row.get(8)?,
        status,
        verified: row.get(10)?,
        created_by: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn parse_reason(row: &Row<'_>, idx: usize) -> rusqlite::Result<ReportReason> {
    let label: String = row.get(idx)?;
    label
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Deletes a single report.
///
/// Dismissal does not touch the event or any other report on it.
///
/// # Errors
///
/// `NotFound` when the report does not exist, `StoreUnavailable` on
/// database failure.
pub fn dismiss_report(conn: &Connection, report_id: &str) -> Result<(), ModerationError> {
    let changed = conn
        .execute("DELETE FROM reports WHERE id = ?1", [report_id])
        .map_err(ModerationError::store)?;

    if changed == 0 {
        return Err(ModerationError::NotFound(format!(
            "report {report_id} does not exist"
        )));
    }

    tracing::info!(report = %report_id, "report dismissed");
    Ok(())
}

/// Deletes every report referencing an event.
///
/// Invoked by the lifecycle manager when an approved event is removed.
/// Returns the number of reports deleted; zero is a normal outcome.
///
/// # Errors
///
/// Returns `ModerationError::StoreUnavailable` on database failure.
pub fn cascade_delete(conn: &Connection, event_id: &str) -> Result<usize, ModerationError> {
    let deleted = conn
        .execute("DELETE FROM reports WHERE event_id = ?1", [event_id])
        .map_err(ModerationError::store)?;

    if deleted > 0 {
        tracing::info!(event = %event_id, count = deleted, "cascaded report deletion");
    }
    Ok(deleted)
}
