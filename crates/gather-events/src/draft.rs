//! Submission validation.

use chrono::{DateTime, NaiveDateTime};
use gather_types::{EventDraft, ModerationError};

/// Accepted layouts for the event instant, beyond RFC 3339.
/// `YYYY-MM-DDTHH:MM` is what the original web form submits.
const DATE_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Validates the user-supplied fields of a submission.
///
/// Title, description, date, city, country, and source link must be
/// non-empty; the date must parse as a valid instant; the source link
/// must be a well-formed absolute URL. The category is already typed and
/// needs no further checking.
///
/// # Errors
///
/// Returns `ModerationError::Validation` naming the first offending
/// field.
pub fn validate_draft(draft: &EventDraft) -> Result<(), ModerationError> {
    let required = [
        ("title", &draft.title),
        ("description", &draft.description),
        ("date", &draft.date),
        ("city", &draft.location.city),
        ("country", &draft.location.country),
        ("sourceLink", &draft.source_link),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ModerationError::Validation(format!(
                "{field} is required"
            )));
        }
    }

    if !is_valid_instant(&draft.date) {
        return Err(ModerationError::Validation(format!(
            "date is not a valid instant: {}",
            draft.date
        )));
    }

    if url::Url::parse(&draft.source_link).is_err() {
        return Err(ModerationError::Validation(format!(
            "sourceLink is not a valid URL: {}",
            draft.source_link
        )));
    }

    Ok(())
}

fn is_valid_instant(value: &str) -> bool {
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return true;
    }
    DATE_LAYOUTS
        .iter()
        .any(|layout| NaiveDateTime::parse_from_str(value, layout).is_ok())
}
