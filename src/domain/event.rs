//! Event domain models.
//!
//! An event is owned by the user who created it and becomes publicly
//! visible once it is flagged verified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A community event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Unique identifier.
    pub id: Uuid,
    /// Event title.
    pub title: String,
    /// Optional long-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Where the event takes place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// When the event starts.
    pub starts_at: DateTime<Utc>,
    /// When the event ends, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    /// Whether the event is visible to anonymous callers.
    pub is_verified: bool,
    /// ID of the user who created the event.
    pub created_by: String,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// When the event was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Writable event fields, used for create and full update.
///
/// Ownership is never accepted from the client.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Only superusers may change this flag.
    #[serde(default)]
    pub is_verified: Option<bool>,
}

/// Partial event update. Absent fields are left untouched; an explicit
/// `null` clears an optional field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub ends_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

/// A present field, `null` included, becomes `Some`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Event {
    /// Create a new unverified-by-default event owned by `created_by`.
    pub fn new(input: NewEvent, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            description: input.description,
            location: input.location,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            is_verified: input.is_verified.unwrap_or(false),
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace all writable fields. `is_verified` is kept when not supplied.
    pub fn replace(&mut self, input: NewEvent) {
        self.title = input.title.trim().to_string();
        self.description = input.description;
        self.location = input.location;
        self.starts_at = input.starts_at;
        self.ends_at = input.ends_at;
        if let Some(verified) = input.is_verified {
            self.is_verified = verified;
        }
        self.updated_at = Utc::now();
    }

    /// Apply the fields present in a partial update.
    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(starts_at) = patch.starts_at {
            self.starts_at = starts_at;
        }
        if let Some(ends_at) = patch.ends_at {
            self.ends_at = ends_at;
        }
        if let Some(verified) = patch.is_verified {
            self.is_verified = verified;
        }
        self.updated_at = Utc::now();
    }

    /// Check field-level invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("Event title is required".to_string());
        }
        if let Some(ends_at) = self.ends_at {
            if ends_at < self.starts_at {
                return Err("Event cannot end before it starts".to_string());
            }
        }
        Ok(())
    }
}
