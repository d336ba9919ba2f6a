use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Display format for note timestamps, e.g. `3/14/2025, 2:05:09 PM`.
pub const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// A saved note.
///
/// Stored as a JSON object with exactly these fields, so collections
/// written by other clients of the same key can be read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Creation time in milliseconds since the Unix epoch.
    pub id: i64,
    /// Generated title, `Voice Note {n}`.
    pub title: String,
    /// Trimmed note body. Never empty.
    pub content: String,
    /// Creation time as a local display string.
    pub timestamp: String,
}

impl Note {
    /// Build the note that becomes entry `position` (1-based) of a collection.
    #[must_use]
    pub fn new<Tz>(id: i64, position: usize, content: impl Into<String>, created: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id,
            title: format!("Voice Note {position}"),
            content: content.into(),
            timestamp: created.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
