//! Unit tests for the transparency log.

use rusqlite::Connection;

use crate::{log_for_viewer, record};
use gather_types::{LogAction, Principal, Role};

/// Creates an in-memory SQLite database with migrations applied.
fn test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("should open in-memory db");
    gather_db::run_migrations(&conn).expect("migrations should succeed");
    conn
}

fn principal(id: &str, role: Role) -> Principal {
    Principal {
        id: id.to_string(),
        name: id.to_string(),
        email: format!("{id}@example.org"),
        role,
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

/// Inserts a minimal event row owned by `created_by`.
fn seed_event(conn: &Connection, id: &str, created_by: &str, status: &str) {
    conn.execute(
        "INSERT INTO events
            (id, title, description, date, city, country, category,
             source_link, status, verified, created_by, created_at)
         VALUES (?1, 't', 'd', '2026-10-01T18:00', 'London', 'UK', 'protest',
                 'https://example.org', ?3, 0, ?2, datetime('now'))",
        [id, created_by, status],
    )
    .expect("should insert event");
}

#[test]
fn record_inserts_immutable_entry() {
    let conn = test_db();
    seed_event(&conn, "e1", "u1", "rejected");

    let entry = record(&conn, "e1", LogAction::Rejected, "duplicate", "mod-1")
        .expect("record should succeed");

    assert_eq!(entry.event_id, "e1");
    assert_eq!(entry.action, LogAction::Rejected);
    assert_eq!(entry.reason, "duplicate");
    assert_eq!(entry.moderator_id, "mod-1");
    assert!(!entry.created_at.is_empty());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transparency_log", [], |row| {
            row.get(0)
        })
        .expect("should count entries");
    assert_eq!(count, 1);
}

#[test]
fn record_accepts_entry_for_deleted_event() {
    // A 'removed' entry is written for an event record that no longer
    // exists; nothing in the schema may forbid that.
    let conn = test_db();

    let entry = record(&conn, "gone", LogAction::Removed, "spam wave", "mod-1")
        .expect("record should succeed without a live event row");
    assert_eq!(entry.action, LogAction::Removed);
}

#[test]
fn anonymous_viewer_sees_empty_log() {
    let conn = test_db();
    seed_event(&conn, "e1", "u1", "rejected");
    record(&conn, "e1", LogAction::Rejected, "dup", "mod-1").expect("record should succeed");

    let entries = log_for_viewer(&conn, None).expect("read should succeed");
    assert!(entries.is_empty());
}

#[test]
fn moderator_sees_all_entries_newest_first() {
    let conn = test_db();
    seed_event(&conn, "e1", "u1", "rejected");
    record(&conn, "e1", LogAction::Rejected, "first", "mod-1").expect("record should succeed");
    record(&conn, "gone", LogAction::Removed, "second", "mod-1").expect("record should succeed");

    let moderator = principal("mod-1", Role::Moderator);
    let entries = log_for_viewer(&conn, Some(&moderator)).expect("read should succeed");

    assert_eq!(entries.len(), 2);
    // Same-second timestamps fall back to id ordering; both entries must
    // be present regardless.
    let reasons: Vec<&str> = entries.iter().map(|e| e.reason.as_str()).collect();
    assert!(reasons.contains(&"first"));
    assert!(reasons.contains(&"second"));
}

#[test]
fn user_sees_only_own_event_entries() {
    let conn = test_db();
    seed_event(&conn, "mine", "u1", "rejected");
    seed_event(&conn, "theirs", "u2", "rejected");
    record(&conn, "mine", LogAction::Rejected, "dup", "mod-1").expect("record should succeed");
    record(&conn, "theirs", LogAction::Rejected, "spam", "mod-1").expect("record should succeed");

    let owner = principal("u1", Role::User);
    let entries = log_for_viewer(&conn, Some(&owner)).expect("read should succeed");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].event_id, "mine");
}

#[test]
fn deleted_target_excludes_entry_for_non_moderators() {
    let conn = test_db();
    record(&conn, "gone", LogAction::Removed, "spam wave", "mod-1")
        .expect("record should succeed");

    let user = principal("u1", Role::User);
    assert!(log_for_viewer(&conn, Some(&user))
        .expect("read should succeed")
        .is_empty());

    let admin = principal("a1", Role::Admin);
    assert!(
        log_for_viewer(&conn, Some(&admin))
            .expect("read should succeed")
            .is_empty(),
        "admin is not a moderator"
    );

    let moderator = principal("mod-1", Role::Moderator);
    assert_eq!(
        log_for_viewer(&conn, Some(&moderator))
            .expect("read should succeed")
            .len(),
        1
    );
}
