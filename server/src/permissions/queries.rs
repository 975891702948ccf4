//! Permission lookup and enforcement helpers.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::event::EventPermissions;

/// Permission resolution errors.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The user is not part of the event's organizer team.
    #[error("Not an organizer of this event")]
    NotOrganiser,

    /// The user is an organizer but lacks the required permission.
    #[error("Missing permission: {0:?}")]
    MissingPermission(EventPermissions),

    /// Database error during permission resolution.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for PermissionError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Compute the effective permissions of a user for an event.
///
/// The event owner implicitly holds all permissions; other users get the
/// bitfield stored on their organizer-team membership row. Returns `None`
/// for users with no relationship to the event.
pub async fn get_event_permissions(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<Option<EventPermissions>, sqlx::Error> {
    let owner: Option<Uuid> =
        sqlx::query_scalar(r"SELECT created_by FROM events WHERE id = $1")
            .bind(event_id)
            .fetch_optional(pool)
            .await?;

    if owner == Some(user_id) {
        return Ok(Some(EventPermissions::all()));
    }

    let bits: Option<i64> = sqlx::query_scalar(
        r"SELECT permissions FROM event_organisers
        WHERE event_id = $1 AND user_id = $2",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(bits.map(EventPermissions::from_db))
}

/// Require that a user holds a permission for an event.
#[tracing::instrument(skip(pool))]
pub async fn require_event_permission(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
    permission: EventPermissions,
) -> Result<(), PermissionError> {
    let perms = get_event_permissions(pool, event_id, user_id)
        .await?
        .ok_or(PermissionError::NotOrganiser)?;

    if perms.has(permission) {
        Ok(())
    } else {
        Err(PermissionError::MissingPermission(permission))
    }
}

/// Add a user to an event's organizer team (used by event duplication to
/// carry the acting organizer over to the copy).
pub async fn add_organiser(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
    permissions: EventPermissions,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"INSERT INTO event_organisers (event_id, user_id, permissions)
        VALUES ($1, $2, $3)
        ON CONFLICT (event_id, user_id) DO UPDATE SET permissions = $3",
    )
    .bind(event_id)
    .bind(user_id)
    .bind(permissions.to_db())
    .execute(pool)
    .await?;
    Ok(())
}
