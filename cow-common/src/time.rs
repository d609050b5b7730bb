//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC timestamp as stored in the database (RFC 3339, microseconds)
///
/// Fixed-width so that lexical ordering in SQLite matches chronological ordering.
pub fn now_rfc3339() -> String {
    to_db_string(&now())
}

/// Format a timestamp the way the database stores it
pub fn to_db_string(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
