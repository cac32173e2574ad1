//! Report aggregator for Gather.
//!
//! Users file reports against approved events; this crate groups the
//! open reports by event for the moderation queue and owns their two
//! destruction paths: individual dismissal and the bulk cascade that
//! runs when an event is removed.
//!
//! Reports are deliberately not deduplicated: the same user may report
//! the same event more than once.

mod store;

pub use store::{cascade_delete, dismiss_report, file_report, list_reported_events, ReportedEvent};
