//! Database models for the event service.
//!
//! These are the row types returned by SQLx queries.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::Event;
use crate::error::EventError;

/// Database row for events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub is_verified: bool,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<EventRow> for Event {
    type Error = EventError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: Uuid::parse_str(&row.id).map_err(|e| EventError::Internal(e.to_string()))?,
            title: row.title,
            description: row.description,
            location: row.location,
            starts_at: parse_timestamp(&row.starts_at)?,
            ends_at: row.ends_at.as_deref().map(parse_timestamp).transpose()?,
            is_verified: row.is_verified,
            created_by: row.created_by,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Fixed-width UTC form so stored timestamps sort lexicographically.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, EventError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| EventError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let row = EventRow {
            id: Uuid::new_v4().to_string(),
            title: "Meetup".to_string(),
            description: None,
            location: Some("Hall".to_string()),
            starts_at: "2026-05-01T18:00:00.000000Z".to_string(),
            ends_at: Some("2026-05-01T20:00:00.000000Z".to_string()),
            is_verified: true,
            created_by: "alice".to_string(),
            created_at: "2026-04-01T09:00:00.000000Z".to_string(),
            updated_at: "2026-04-01T09:00:00.000000Z".to_string(),
        };

        let event: Event = row.try_into().unwrap();
        assert_eq!(event.created_by, "alice");
        assert!(event.is_verified);
        assert!(event.ends_at.unwrap() > event.starts_at);
    }

    #[test]
    fn test_bad_id_is_internal_error() {
        let row = EventRow {
            id: "not-a-uuid".to_string(),
            title: "Meetup".to_string(),
            description: None,
            location: None,
            starts_at: "2026-05-01T18:00:00Z".to_string(),
            ends_at: None,
            is_verified: false,
            created_by: "alice".to_string(),
            created_at: "2026-04-01T09:00:00Z".to_string(),
            updated_at: "2026-04-01T09:00:00Z".to_string(),
        };

        let result: Result<Event, _> = row.try_into();
        assert!(matches!(result, Err(EventError::Internal(_))));
    }

    #[test]
    fn test_timestamp_format_is_sortable() {
        let earlier = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2026-01-01T00:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);

        assert!(format_timestamp(&earlier) < format_timestamp(&later));
        assert_eq!(format_timestamp(&earlier), "2026-01-01T00:00:00.000000Z");
    }
}
