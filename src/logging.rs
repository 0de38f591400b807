//! Helpers for logging request data without leaking secrets.

use crate::Fields;

const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Render `fields` as `key=value` pairs for the logs, with password values
/// replaced by asterisks.
pub(crate) fn redact_fields(fields: &Fields) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            if REDACTED_FIELDS.contains(&key) {
                format!("{key}=********")
            } else {
                format!("{key}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
