//! Queries for core entities (users, events).

use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Event, User};

/// Find a user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r"SELECT id, username, display_name, email, created_at
        FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Find an event by its URL slug.
pub async fn find_event_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r"SELECT id, slug, name, locale, created_by, created_at
        FROM events WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
}

/// Insert a new event.
///
/// Generic over the executor so event duplication can run it inside the
/// same transaction that copies the pages.
pub async fn insert_event<'e, E>(
    executor: E,
    slug: &str,
    name: &str,
    locale: &str,
    created_by: Uuid,
) -> Result<Event, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Event>(
        r"INSERT INTO events (id, slug, name, locale, created_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, slug, name, locale, created_by, created_at",
    )
    .bind(Uuid::now_v7())
    .bind(slug)
    .bind(name)
    .bind(locale)
    .bind(created_by)
    .fetch_one(executor)
    .await
}

/// Delete an event row.
///
/// Callers must remove dependent rows first; see
/// `pages::queries::delete_all_for_event`, invoked by the event lifecycle
/// handler before this runs.
pub async fn delete_event<'e, E>(executor: E, event_id: Uuid) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(r"DELETE FROM events WHERE id = $1")
        .bind(event_id)
        .execute(executor)
        .await?;
    Ok(())
}
