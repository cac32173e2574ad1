//! State machine transitions.
//!
//! Every transition write carries its lifecycle precondition in the SQL
//! (`AND status = ...`), so a lost race against a concurrent moderator
//! changes zero rows and is surfaced as `InvalidTransition` instead of
//! overwriting the winner.

use gather_types::{
    can_moderate, Event, EventDraft, LogAction, ModerationError, Principal,
    TransparencyLogEntry,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::draft::validate_draft;
use crate::store::{get_event, map_event, EVENT_COLUMNS};

/// Result of removing an approved event.
#[derive(Debug)]
pub struct RemovalOutcome {
    /// The transparency entry recorded for the removal.
    pub log_entry: TransparencyLogEntry,
    /// Number of reports deleted by the cascade, or `None` when the
    /// cascade failed and orphaned reports need operator reconciliation.
    pub reports_deleted: Option<usize>,
}

fn ensure_moderator(principal: &Principal, action: &str) -> Result<(), ModerationError> {
    if can_moderate(principal) {
        Ok(())
    } else {
        Err(ModerationError::PermissionDenied(format!(
            "{action} requires the moderator role"
        )))
    }
}

/// Distinguishes a missing event from a lifecycle violation after a
/// precondition write changed zero rows.
fn transition_failure(
    conn: &Connection,
    event_id: &str,
    transition: &str,
    expected: &str,
) -> ModerationError {
    match get_event(conn, event_id) {
        Ok(Some(event)) => ModerationError::InvalidTransition(format!(
            "cannot {transition} event {event_id}: status is '{}', expected '{expected}'",
            event.status
        )),
        Ok(None) => ModerationError::NotFound(format!("event {event_id} does not exist")),
        Err(e) => e,
    }
}

/// Submits a new event.
///
/// The draft is validated (required fields, date, source URL), then stored
/// with `status = pending`, `verified = false`, and a server-assigned
/// creation timestamp. Submission never touches the transparency log.
///
/// # Errors
///
/// `Validation` on a bad draft, `StoreUnavailable` on database failure.
pub fn submit_event(
    conn: &Connection,
    draft: &EventDraft,
    submitter_id: &str,
) -> Result<Event, ModerationError> {
    validate_draft(draft)?;

    let id = Uuid::new_v4().to_string();
    let event = conn
        .query_row(
            &format!(
                "INSERT INTO events
                    (id, title, description, date, city, country, category,
                     source_link, organizer, status, verified, created_by, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', 0, ?10, datetime('now'))
                 RETURNING {EVENT_COLUMNS}"
            ),
            params![
                id,
                draft.title.trim(),
                draft.description.trim(),
                draft.date,
                draft.location.city.trim(),
                draft.location.country.trim(),
                draft.category.as_str(),
                draft.source_link,
                draft.organizer,
                submitter_id,
            ],
            map_event,
        )
        .map_err(ModerationError::store)?;

    tracing::info!(event = %event.id, submitter = %submitter_id, "event submitted");
    Ok(event)
}

/// Approves a pending event, optionally marking it verified.
///
/// Legal only from `pending`; the update is conditioned on the current
/// status so concurrent moderators cannot both win. Approval is never
/// recorded in the transparency log.
///
/// # Errors
///
/// `PermissionDenied` for non-moderators, `NotFound` when the id does
/// not resolve, `InvalidTransition` when the event is not pending
/// (including a lost race), `StoreUnavailable` on database failure.
pub fn approve_event(
    conn: &Connection,
    moderator: &Principal,
    event_id: &str,
    verified: bool,
) -> Result<Event, ModerationError> {
    ensure_moderator(moderator, "approve")?;

    let changed = conn
        .execute(
            "UPDATE events SET status = 'approved', verified = ?1
             WHERE id = ?2 AND status = 'pending'",
            params![verified, event_id],
        )
        .map_err(ModerationError::store)?;

    if changed == 0 {
        return Err(transition_failure(conn, event_id, "approve", "pending"));
    }

    tracing::info!(
        event = %event_id,
        moderator = %moderator.id,
        verified,
        "event approved"
    );

    get_event(conn, event_id)?.ok_or_else(|| {
        // Removed out from under us between the write and the read-back.
        ModerationError::NotFound(format!("event {event_id} does not exist"))
    })
}

/// Rejects a pending event, recording exactly one transparency entry.
///
/// The status flip and the log entry commit in a single transaction: a
/// rejection can never be observed without its audit record.
///
/// # Errors
///
/// `PermissionDenied` for non-moderators, `Validation` on an empty
/// reason, `NotFound`/`InvalidTransition` as for approval,
/// `StoreUnavailable` on database failure.
pub fn reject_event(
    conn: &Connection,
    moderator: &Principal,
    event_id: &str,
    reason: &str,
) -> Result<TransparencyLogEntry, ModerationError> {
    ensure_moderator(moderator, "reject")?;

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ModerationError::Validation(
            "a rejection reason is required".to_string(),
        ));
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(ModerationError::store)?;

    let changed = tx
        .execute(
            "UPDATE events SET status = 'rejected'
             WHERE id = ?1 AND status = 'pending'",
            [event_id],
        )
        .map_err(ModerationError::store)?;

    if changed == 0 {
        drop(tx);
        return Err(transition_failure(conn, event_id, "reject", "pending"));
    }

    let entry =
        gather_transparency::record(&tx, event_id, LogAction::Rejected, reason, &moderator.id)?;

    tx.commit().map_err(ModerationError::store)?;

    tracing::info!(
        event = %event_id,
        moderator = %moderator.id,
        "event rejected"
    );
    Ok(entry)
}

/// Removes an approved event.
///
/// Deletes the record (legal only from `approved`, including events whose
/// date has passed), records the transparency entry in the same
/// transaction, then cascades report deletion best-effort: a cascade
/// failure is logged and reported in the outcome, never blocks the
/// removal or its audit entry.
///
/// # Errors
///
/// `PermissionDenied` for non-moderators, `Validation` on an empty
/// reason, `NotFound` when the id does not resolve, `InvalidTransition`
/// when the event is not approved, `StoreUnavailable` on database
/// failure.
pub fn remove_event(
    conn: &Connection,
    moderator: &Principal,
    event_id: &str,
    reason: &str,
) -> Result<RemovalOutcome, ModerationError> {
    ensure_moderator(moderator, "remove")?;

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ModerationError::Validation(
            "a removal reason is required".to_string(),
        ));
    }

    let tx = conn
        .unchecked_transaction()
        .map_err(ModerationError::store)?;

    let changed = tx
        .execute(
            "DELETE FROM events WHERE id = ?1 AND status = 'approved'",
            [event_id],
        )
        .map_err(ModerationError::store)?;

    if changed == 0 {
        drop(tx);
        return Err(transition_failure(conn, event_id, "remove", "approved"));
    }

    let entry =
        gather_transparency::record(&tx, event_id, LogAction::Removed, reason, &moderator.id)?;

    tx.commit().map_err(ModerationError::store)?;

    // Best-effort cascade after the removal has committed. Orphaned
    // reports are reconciled by an operator, not by failing the removal.
    let reports_deleted = match gather_reports::cascade_delete(conn, event_id) {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(
                event = %event_id,
                error = %e,
                "report cascade failed after removal; orphaned reports remain"
            );
            None
        }
    };

    tracing::info!(
        event = %event_id,
        moderator = %moderator.id,
        reports_deleted = ?reports_deleted,
        "event removed"
    );

    Ok(RemovalOutcome {
        log_entry: entry,
        reports_deleted,
    })
}
