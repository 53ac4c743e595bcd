//! Shared primitive IDs and timestamp helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Row identifier assigned by the contact table.
pub type ContactId = i64;

/// Id value meaning "not yet assigned"; upsert generates a fresh id for it.
pub const UNASSIGNED_CONTACT_ID: ContactId = 0;

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// Callers stamp this into [`crate::contact::Contact::last_edited`] at save
/// time; the store never sets it.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
