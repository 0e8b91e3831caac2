//! Repository layer for database operations.

use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::domain::{Event, EventScope};
use crate::error::{EventError, EventResult};
use crate::storage::models::{format_timestamp, EventRow};

/// Repository for event database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> EventResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                location TEXT,
                starts_at TEXT NOT NULL,
                ends_at TEXT,
                is_verified BOOLEAN NOT NULL DEFAULT 0,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_created_by ON events(created_by);
            CREATE INDEX IF NOT EXISTS idx_events_is_verified ON events(is_verified);
            CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Save a new event.
    pub async fn create_event(&self, event: &Event) -> EventResult<()> {
        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, description, location, starts_at, ends_at,
                is_verified, created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.id.to_string())
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(format_timestamp(&event.starts_at))
        .bind(event.ends_at.as_ref().map(format_timestamp))
        .bind(event.is_verified)
        .bind(&event.created_by)
        .bind(format_timestamp(&event.created_at))
        .bind(format_timestamp(&event.updated_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List events inside `scope`, oldest first.
    pub async fn list_events(
        &self,
        scope: &EventScope,
        limit: i64,
        offset: i64,
    ) -> EventResult<Vec<Event>> {
        let (predicate, owner) = scope_predicate(scope);
        let sql = format!(
            "SELECT * FROM events WHERE {} ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
            predicate
        );

        let mut query = sqlx::query_as::<_, EventRow>(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Count events inside `scope`.
    pub async fn count_events(&self, scope: &EventScope) -> EventResult<i64> {
        let (predicate, owner) = scope_predicate(scope);
        let sql = format!("SELECT COUNT(*) FROM events WHERE {}", predicate);

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }

        Ok(query.fetch_one(&self.pool).await?)
    }

    /// Get an event by ID, looked up inside `scope`.
    ///
    /// Events outside the scope are reported as not found.
    pub async fn get_event(&self, scope: &EventScope, id: Uuid) -> EventResult<Event> {
        let (predicate, owner) = scope_predicate(scope);
        let sql = format!("SELECT * FROM events WHERE id = ? AND {}", predicate);

        let mut query = sqlx::query_as::<_, EventRow>(&sql).bind(id.to_string());
        if let Some(owner) = owner {
            query = query.bind(owner);
        }

        let row = query
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| EventError::NotFound(format!("Event {} not found", id)))?;

        row.try_into()
    }

    /// Persist all writable fields of an existing event.
    pub async fn update_event(&self, event: &Event) -> EventResult<Event> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = ?, description = ?, location = ?, starts_at = ?, ends_at = ?,
                is_verified = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(format_timestamp(&event.starts_at))
        .bind(event.ends_at.as_ref().map(format_timestamp))
        .bind(event.is_verified)
        .bind(format_timestamp(&event.updated_at))
        .bind(event.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EventError::NotFound(format!("Event {} not found", event.id)));
        }

        self.get_event(&EventScope::All, event.id).await
    }

    /// Delete an event.
    pub async fn delete_event(&self, id: Uuid) -> EventResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EventError::NotFound(format!("Event {} not found", id)));
        }

        Ok(())
    }
}

/// SQL predicate for a scope plus the owner to bind into it, if any.
fn scope_predicate(scope: &EventScope) -> (&'static str, Option<&str>) {
    match scope {
        EventScope::VerifiedOnly => ("is_verified = 1", None),
        EventScope::All => ("1 = 1", None),
        EventScope::OwnedOrVerified(owner) => {
            ("(created_by = ? OR is_verified = 1)", Some(owner.as_str()))
        }
    }
}

/// Single-connection in-memory database with the schema applied.
#[cfg(test)]
pub async fn setup_test_db() -> EventRepository {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    let repo = EventRepository::new(pool);
    repo.init_schema().await.expect("Failed to init schema");
    repo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Caller, NewEvent, UserRole};
    use chrono::{Duration, Utc};
    use std::collections::HashSet;

    fn event(title: &str, owner: &str, verified: bool) -> Event {
        let mut event = Event::new(
            NewEvent {
                title: title.to_string(),
                description: None,
                location: None,
                starts_at: Utc::now() + Duration::days(7),
                ends_at: None,
                is_verified: None,
            },
            owner,
        );
        event.is_verified = verified;
        event
    }

    async fn seed(repo: &EventRepository) -> Vec<Event> {
        let events = vec![
            event("verified by alice", "alice", true),
            event("alice draft", "alice", false),
            event("verified by bob", "bob", true),
            event("bob draft", "bob", false),
        ];
        for e in &events {
            repo.create_event(e).await.unwrap();
        }
        events
    }

    fn titles(events: &[Event]) -> HashSet<String> {
        events.iter().map(|e| e.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_create_and_get_event() {
        let repo = setup_test_db().await;
        let created = event("Meetup", "alice", false);
        repo.create_event(&created).await.unwrap();

        let fetched = repo.get_event(&EventScope::All, created.id).await.unwrap();
        assert_eq!(fetched.title, "Meetup");
        assert_eq!(fetched.created_by, "alice");
        assert!(!fetched.is_verified);
    }

    #[tokio::test]
    async fn test_anonymous_scope_lists_only_verified() {
        let repo = setup_test_db().await;
        seed(&repo).await;

        let listed = repo
            .list_events(&Caller::Anonymous.scope(), 100, 0)
            .await
            .unwrap();

        assert_eq!(
            titles(&listed),
            HashSet::from(["verified by alice".to_string(), "verified by bob".to_string()])
        );
        assert_eq!(
            repo.count_events(&EventScope::VerifiedOnly).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_superuser_scope_lists_everything() {
        let repo = setup_test_db().await;
        let seeded = seed(&repo).await;

        let scope = Caller::user("root", UserRole::Superuser).scope();
        let listed = repo.list_events(&scope, 100, 0).await.unwrap();

        assert_eq!(titles(&listed), titles(&seeded));
    }

    #[tokio::test]
    async fn test_member_scope_lists_own_and_verified() {
        let repo = setup_test_db().await;
        let seeded = seed(&repo).await;

        let alice = Caller::user("alice", UserRole::Member);
        let listed = repo.list_events(&alice.scope(), 100, 0).await.unwrap();

        let expected: Vec<Event> = seeded
            .into_iter()
            .filter(|e| e.created_by == "alice" || e.is_verified)
            .collect();
        assert_eq!(titles(&listed), titles(&expected));
        assert_eq!(titles(&listed).len(), 3);

        // The SQL filter and the in-process predicate agree
        assert!(listed.iter().all(|e| alice.can_view(e)));
    }

    #[tokio::test]
    async fn test_get_outside_scope_is_not_found() {
        let repo = setup_test_db().await;
        let seeded = seed(&repo).await;
        let bob_draft = seeded.iter().find(|e| e.title == "bob draft").unwrap();

        let alice = Caller::user("alice", UserRole::Member);
        let result = repo.get_event(&alice.scope(), bob_draft.id).await;
        assert!(matches!(result, Err(EventError::NotFound(_))));

        let bob = Caller::user("bob", UserRole::Member);
        assert!(repo.get_event(&bob.scope(), bob_draft.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_orders_by_creation_and_paginates() {
        let repo = setup_test_db().await;
        let base = Utc::now();
        for (i, title) in ["third", "first", "second"].iter().enumerate() {
            let mut e = event(title, "alice", true);
            e.created_at = match i {
                0 => base + Duration::seconds(2),
                1 => base,
                _ => base + Duration::seconds(1),
            };
            repo.create_event(&e).await.unwrap();
        }

        let all = repo.list_events(&EventScope::All, 10, 0).await.unwrap();
        let order: Vec<&str> = all.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);

        let page = repo.list_events(&EventScope::All, 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "second");
    }

    #[tokio::test]
    async fn test_update_event() {
        let repo = setup_test_db().await;
        let mut e = event("Meetup", "alice", false);
        repo.create_event(&e).await.unwrap();

        e.title = "Renamed".to_string();
        e.is_verified = true;
        let updated = repo.update_event(&e).await.unwrap();

        assert_eq!(updated.title, "Renamed");
        assert!(updated.is_verified);
        assert_eq!(updated.created_by, "alice");
    }

    #[tokio::test]
    async fn test_delete_event() {
        let repo = setup_test_db().await;
        let e = event("Meetup", "alice", true);
        repo.create_event(&e).await.unwrap();

        repo.delete_event(e.id).await.unwrap();

        assert!(matches!(
            repo.get_event(&EventScope::All, e.id).await,
            Err(EventError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete_event(e.id).await,
            Err(EventError::NotFound(_))
        ));
    }
}
