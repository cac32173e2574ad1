//! Persistence and query operations for event records.
//!
//! All reads filter on status in SQL; the substring filters of the
//! public feed are applied in code, matching the case-insensitive
//! contains semantics the listing contract specifies.

use gather_types::{Event, EventCategory, EventFilters, EventStatus, Location, ModerationError};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

pub(crate) const EVENT_COLUMNS: &str =
    "id, title, description, date, city, country, category, source_link,
     organizer, status, verified, created_by, created_at";

/// Maps a row selected with [`EVENT_COLUMNS`] to an [`Event`].
///
/// A corrupt status or category label surfaces as a column conversion
/// failure rather than a panic.
pub(crate) fn map_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    let category_label: String = row.get(6)?;
    let category: EventCategory = category_label.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
    })?;

    let status_label: String = row.get(9)?;
    let status: EventStatus = status_label.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e))
    })?;

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

/// Fetches a single event regardless of status.
///
/// Returns `Ok(None)` when the id does not resolve — callers treat a
/// vanished event as an expected outcome of concurrent moderation, not a
/// fatal error.
///
/// # Errors
///
/// Returns `ModerationError::StoreUnavailable` on database failure.
pub fn get_event(conn: &Connection, id: &str) -> Result<Option<Event>, ModerationError> {
    conn.query_row(
        &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
        [id],
        map_event,
    )
    .optional()
    .map_err(ModerationError::store)
}

/// Lists approved events for the public feed, ordered by date ascending.
///
/// Filters narrow the result: `search` is a case-insensitive substring
/// match across title, description, city, and country; `location`
/// matches city or country; `category` is an exact match, with the
/// literal `all` (or empty) meaning no category filter.
///
/// # Errors
///
/// Returns `ModerationError::StoreUnavailable` on database failure.
pub fn list_approved(
    conn: &Connection,
    filters: &EventFilters,
) -> Result<Vec<Event>, ModerationError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE status = 'approved'
             ORDER BY date ASC"
        ))
        .map_err(ModerationError::store)?;

    let rows = stmt
        .query_map([], map_event)
        .map_err(ModerationError::store)?;

    let mut events = Vec::new();
    for row in rows {
        let event = row.map_err(ModerationError::store)?;
        if matches_filters(&event, filters) {
            events.push(event);
        }
    }

    Ok(events)
}

fn matches_filters(event: &Event, filters: &EventFilters) -> bool {
    if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        let hit = event.title.to_lowercase().contains(&needle)
            || event.description.to_lowercase().contains(&needle)
            || event.location.city.to_lowercase().contains(&needle)
            || event.location.country.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }

    if let Some(location) = filters.location.as_deref().filter(|s| !s.is_empty()) {
        let needle = location.to_lowercase();
        let hit = event.location.city.to_lowercase().contains(&needle)
            || event.location.country.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }

    if let Some(category) = filters
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "all")
    {
        if event.category.as_str() != category {
            return false;
        }
    }

    true
}

/// Lists pending events for the moderation queue, newest submission
/// first.
///
/// # Errors
///
/// Returns `ModerationError::StoreUnavailable` on database failure.
pub fn list_pending(conn: &Connection) -> Result<Vec<Event>, ModerationError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE status = 'pending'
             ORDER BY created_at DESC, id DESC"
        ))
        .map_err(ModerationError::store)?;

    let rows = stmt
        .query_map([], map_event)
        .map_err(ModerationError::store)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(ModerationError::store)
}
