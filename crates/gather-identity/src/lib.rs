//! Identity provider boundary for Gather.
//!
//! Authentication protocol internals are delegated to an external
//! identity provider; this crate owns only what the core consumes: a
//! stable user record, role classification, and bearer-token principal
//! resolution.
//!
//! Role classification follows a single configuration knob: a user whose
//! email matches the configured moderator email is a `moderator`;
//! everyone else is a `user`. The reserved `admin` tag can exist in the
//! `users` table but no rule treats it differently from `user`.
//!
//! In the current phase the bearer token *is* the user id. There is no
//! per-request signature verification; session hardening belongs to the
//! external provider, not to this crate.

mod error;
mod users;

pub use error::IdentityError;
pub use users::{classify_role, principal_for_token, register_user};
