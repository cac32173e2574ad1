//! Transparency recorder for Gather.
//!
//! Every rejection and removal appends one immutable entry to the
//! `transparency_log` table; approvals never do. No update or delete
//! operation exists for entries anywhere in the codebase — the log is
//! the accountability record of the moderation process.
//!
//! Reads are viewer-filtered: moderators see every entry; a regular user
//! sees only entries for events they submitted; anonymous viewers see
//! nothing. An entry whose target event was removed can no longer prove
//! ownership, so non-moderators never see it.

mod store;

pub use store::{log_for_viewer, record};

#[cfg(test)]
mod tests;
