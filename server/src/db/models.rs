//! Core database models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user account.
///
/// Account management (registration, passwords, sessions) lives in the
/// platform core; this service only loads users to authenticate requests.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A conference event. Pages are always scoped to exactly one event.
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
pub struct Event {
    pub id: Uuid,
    /// URL identifier of the event (e.g., "democon-2026").
    pub slug: String,
    pub name: String,
    /// Primary locale used to resolve localized text (e.g., "en").
    pub locale: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
