use crate::fields::Fields;
use crate::level::Level;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const TIMESTAMP_KEY: &str = "timestamp";
pub const LEVEL_KEY: &str = "level";
pub const MESSAGE_KEY: &str = "message";

/// A single emitted log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>, fields: Fields) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            fields,
        }
    }

    /// RFC 3339 timestamp with nanosecond precision.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn is_reserved(key: &str) -> bool {
    matches!(key, TIMESTAMP_KEY | LEVEL_KEY | MESSAGE_KEY)
}

/// Flat object: `timestamp`, `level`, `message` followed by the fields.
/// A field named like one of the first three is written as `fields.<name>`.
impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 3))?;
        map.serialize_entry(TIMESTAMP_KEY, &self.timestamp_string())?;
        map.serialize_entry(LEVEL_KEY, &self.level)?;
        map.serialize_entry(MESSAGE_KEY, &self.message)?;
        for (key, value) in &self.fields {
            if is_reserved(key) {
                map.serialize_entry(&format!("fields.{key}"), value)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}
