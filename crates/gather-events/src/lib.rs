//! Event lifecycle manager for Gather.
//!
//! Owns the event state machine and its transition rules:
//!
//! ```text
//! submit ──> pending ──approve──> approved ──remove──> (deleted + log entry)
//!                └─────reject───> rejected  (+ log entry)
//! ```
//!
//! Status only moves forward. Removal is not a stored status: the event
//! record is destroyed and the transparency log preserves the action.
//! Every transition write carries a status precondition so that two
//! moderators racing on the same event produce exactly one winner; the
//! loser observes `InvalidTransition`, never a silent overwrite.

mod draft;
mod lifecycle;
mod store;

pub use draft::validate_draft;
pub use lifecycle::{
    approve_event, reject_event, remove_event, submit_event, RemovalOutcome,
};
pub use store::{get_event, list_approved, list_pending};
