//! Resolved configuration entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A key/value pair resolved from the store.
///
/// The value is kept as the string the store returned; typed readers parse
/// it on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    key: String,
    value: String,
    resolved_at: DateTime<Utc>,
}

impl ConfigEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::resolved_at(key, value, Utc::now())
    }

    /// Creates an entry with an explicit resolution time.
    pub fn resolved_at(
        key: impl Into<String>,
        value: impl Into<String>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            resolved_at,
        }
    }

    /// Returns the fully qualified key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the raw string value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns when the value was fetched from the store.
    pub fn resolved_at_time(&self) -> DateTime<Utc> {
        self.resolved_at
    }
}
