//! Item types and validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Shortest accepted name, in characters.
pub const NAME_MIN_LEN: usize = 1;
/// Longest accepted name, in characters.
pub const NAME_MAX_LEN: usize = 100;
/// Smallest accepted quantity.
pub const QUANTITY_MIN: i64 = 1;
/// Largest accepted quantity.
pub const QUANTITY_MAX: i64 = 1_000_000;

/// A stored item. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Registry-assigned identifier.
    #[schema(example = "3f2a9c1b7d4e")]
    pub id: String,
    /// Item name.
    #[schema(example = "widget")]
    pub name: String,
    /// Item quantity.
    #[schema(example = 5)]
    pub quantity: i64,
    /// Creation time, UTC, whole seconds.
    #[serde(with = "timestamp")]
    #[schema(value_type = String, format = DateTime, example = "2026-10-16T12:00:00Z")]
    pub created_at: DateTime<Utc>,
}

/// Request body for creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewItem {
    /// Item name, 1 to 100 characters.
    #[schema(example = "widget", min_length = 1, max_length = 100)]
    pub name: String,
    /// Quantity, 1 to 1,000,000.
    #[schema(example = 5, minimum = 1, maximum = 1000000)]
    pub quantity: i64,
}

impl NewItem {
    /// Create a new item request.
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }

    /// Check name length and quantity range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let len = self.name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
            return Err(ValidationError::NameLength {
                min: NAME_MIN_LEN,
                max: NAME_MAX_LEN,
                actual: len,
            });
        }

        if !(QUANTITY_MIN..=QUANTITY_MAX).contains(&self.quantity) {
            return Err(ValidationError::QuantityRange {
                min: QUANTITY_MIN,
                max: QUANTITY_MAX,
                actual: self.quantity,
            });
        }

        Ok(())
    }
}

/// RFC 3339 with second precision and a `Z` suffix.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Render a timestamp.
    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
