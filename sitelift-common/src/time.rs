//! Timestamp utilities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Filesystem-safe stamp `<unix-millis>_<8 hex chars of id>`
///
/// The millisecond part keeps names sortable by creation time; the id suffix keeps
/// two jobs started in the same millisecond apart.
pub fn job_stamp(id: Uuid) -> String {
    let simple = id.simple().to_string();
    format!("{}_{}", now().timestamp_millis(), &simple[..8])
}
