//! Shared types, error definitions, and visibility rules for Gather.
//!
//! This crate provides the foundational types used across all Gather
//! crates: the event, report, and transparency-log records, the principal
//! and role model, the shared moderation error taxonomy (via `thiserror`),
//! and the pure visibility rules applied by the other components.
//!
//! No crate in the workspace depends on anything *except* `gather-types`
//! for cross-cutting type definitions. This keeps the dependency graph
//! clean and prevents circular dependencies.

use serde::{Deserialize, Serialize};

mod error;
mod visibility;

pub use error::ModerationError;
pub use visibility::{can_moderate, event_visible, feed_visible, log_entry_visible};

/// Authorization roles for a principal.
///
/// `moderator` is the only role that unlocks moderation actions. `admin`
/// exists in the data model but is treated exactly like `user` by every
/// authorization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular authenticated user.
    User,
    /// A moderator: may approve, reject, and remove events.
    Moderator,
    /// Reserved role tag; no rule distinguishes it from `User`.
    Admin,
}

impl Role {
    /// Returns the canonical string label for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseEnumError::new("role", s)),
        }
    }
}

/// Lifecycle status of an event.
///
/// Status only moves forward: `pending → approved` or `pending → rejected`.
/// Removal of an approved event is not a fourth status — the record is
/// deleted and a transparency entry preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Initial status on submission; visible only in the moderation queue.
    Pending,
    /// Publicly visible in the event feed.
    Approved,
    /// Terminal status; never shown publicly.
    Rejected,
}

impl EventStatus {
    /// Returns the canonical string label for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseEnumError::new("event status", s)),
        }
    }
}

/// Category of a listed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Street demonstrations, marches, rallies.
    Protest,
    /// Film screenings, concerts, community gatherings.
    Cultural,
    /// Workshops, lectures, teach-ins.
    Educational,
    /// Online events: streams, virtual actions.
    Digital,
}

impl EventCategory {
    /// Returns the canonical string label for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Protest => "protest",
            Self::Cultural => "cultural",
            Self::Educational => "educational",
            Self::Digital => "digital",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "protest" => Ok(Self::Protest),
            "cultural" => Ok(Self::Cultural),
            "educational" => Ok(Self::Educational),
            "digital" => Ok(Self::Digital),
            _ => Err(ParseEnumError::new("event category", s)),
        }
    }
}

/// Reason attached to a user report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    /// The listing contains incorrect information.
    WrongInfo,
    /// The listing is spam or off-topic.
    Spam,
    /// The listing contains harmful content.
    HarmfulContent,
}

impl ReportReason {
    /// Returns the canonical string label for this reason.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WrongInfo => "wrong_info",
            Self::Spam => "spam",
            Self::HarmfulContent => "harmful_content",
        }
    }
}

impl std::str::FromStr for ReportReason {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrong_info" => Ok(Self::WrongInfo),
            "spam" => Ok(Self::Spam),
            "harmful_content" => Ok(Self::HarmfulContent),
            _ => Err(ParseEnumError::new("report reason", s)),
        }
    }
}

/// Moderation action recorded in the transparency log.
///
/// Only rejections and removals are logged; approvals never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    /// A pending event was rejected during review.
    Rejected,
    /// An approved event was removed after publication.
    Removed,
}

impl LogAction {
    /// Returns the canonical string label for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::Removed => "removed",
        }
    }
}

impl std::str::FromStr for LogAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rejected" => Ok(Self::Rejected),
            "removed" => Ok(Self::Removed),
            _ => Err(ParseEnumError::new("log action", s)),
        }
    }
}

/// Error returned when parsing an unknown enum label from storage or wire.
#[derive(Debug, Clone)]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// Where an event takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// City name, or a label such as "Online" for digital events.
    pub city: String,
    /// Country name, or "Global".
    pub country: String,
}

/// A community event listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Opaque event id (UUID v4).
    pub id: String,
    /// Event title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// When the event takes place (ISO 8601, validated at submission).
    pub date: String,
    /// Where the event takes place.
    pub location: Location,
    /// Event category.
    pub category: EventCategory,
    /// External source URL backing the listing.
    #[serde(rename = "sourceLink")]
    pub source_link: String,
    /// Optional organizer name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Whether a moderator marked the listing as verified.
    /// Invariant: `verified == true` implies `status == Approved`.
    pub verified: bool,
    /// Id of the submitting user.
    #[serde(rename = "createdBy")]
    pub created_by: String,
    /// ISO 8601 submission timestamp, server-assigned.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// User-supplied fields of an event submission.
///
/// Status, verified flag, creator, and timestamps are assigned by the
/// lifecycle manager, never by the submitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    /// Event title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// When the event takes place.
    pub date: String,
    /// Where the event takes place.
    pub location: Location,
    /// Event category.
    pub category: EventCategory,
    /// External source URL backing the listing.
    #[serde(rename = "sourceLink")]
    pub source_link: String,
    /// Optional organizer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
}

/// Filters for the public approved-event feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilters {
    /// Case-insensitive substring match across title, description, city,
    /// and country.
    pub search: Option<String>,
    /// Case-insensitive substring match on city or country.
    pub location: Option<String>,
    /// Exact category match. The literal `all` disables the filter.
    pub category: Option<String>,
}

/// A user report filed against an approved event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Opaque report id (UUID v4).
    pub id: String,
    /// Id of the reported event.
    #[serde(rename = "eventId")]
    pub event_id: String,
    /// Id of the reporting user.
    #[serde(rename = "reportedBy")]
    pub reported_by: String,
    /// Why the event was reported.
    pub reason: ReportReason,
    /// ISO 8601 creation timestamp, server-assigned.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// An immutable entry in the moderation transparency log.
///
/// Entries are append-only: no update or delete operation exists for them
/// anywhere in the codebase. This is the accountability invariant of the
/// system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransparencyLogEntry {
    /// Opaque entry id (UUID v4).
    pub id: String,
    /// Id of the event the action targeted. The event itself may no
    /// longer exist (removal deletes the record).
    #[serde(rename = "eventId")]
    pub event_id: String,
    /// The moderation action taken.
    pub action: LogAction,
    /// Free-text reason supplied by the moderator.
    pub reason: String,
    /// Id of the acting moderator.
    #[serde(rename = "moderatorId")]
    pub moderator_id: String,
    /// ISO 8601 timestamp, server-assigned.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// An authenticated principal, as yielded by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Stable user identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Authorization role.
    pub role: Role,
    /// ISO 8601 account creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
