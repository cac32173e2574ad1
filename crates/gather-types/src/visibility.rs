//! Pure visibility rules.
//!
//! Visibility is a function of (viewer role, viewer id, entity) — it is
//! computed at read time by the lifecycle manager, report aggregator, and
//! transparency recorder, never stored.

use crate::{Event, EventStatus, Principal, Role};

/// Whether the principal may perform moderation actions.
///
/// Only the `moderator` role qualifies; `admin` is deliberately treated
/// like `user`.
pub fn can_moderate(principal: &Principal) -> bool {
    principal.role == Role::Moderator
}

/// Whether an event belongs in the public feed.
pub fn feed_visible(event: &Event) -> bool {
    event.status == EventStatus::Approved
}

/// Whether a single event is visible to the given viewer.
///
/// Approved events are public. Pending and rejected events are visible
/// only to moderators and to their own creator.
pub fn event_visible(viewer: Option<&Principal>, event: &Event) -> bool {
    if event.status == EventStatus::Approved {
        return true;
    }
    match viewer {
        Some(p) => can_moderate(p) || p.id == event.created_by,
        None => false,
    }
}

/// Whether a transparency-log entry is visible to the given viewer.
///
/// `event_creator` is the `created_by` of the entry's target event, or
/// `None` when the event no longer exists (removal deletes the record).
/// Moderators see every entry. A regular user sees an entry only when the
/// target event still resolves and they created it; an unresolvable
/// target excludes the entry entirely. Anonymous viewers see nothing.
pub fn log_entry_visible(viewer: Option<&Principal>, event_creator: Option<&str>) -> bool {
    match viewer {
        Some(p) if can_moderate(p) => true,
        Some(p) => event_creator == Some(p.id.as_str()),
        None => false,
    }
}
