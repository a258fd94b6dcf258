//! Inspection numbers.

use chrono::{DateTime, Utc};

/// Build an inspection number: the form prefix and the creation time in
/// milliseconds since the epoch.
pub fn inspection_number(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, at.timestamp_millis())
}
