//! Event lifecycle handlers.
//!
//! Only the parts of the event lifecycle that touch pages live here:
//! deleting an event removes its pages explicitly in the same transaction,
//! and duplicating an event copies its pages with fresh positions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db::models::Event;
use crate::db::queries as db_queries;
use crate::events::error::{EventError, EventResult};
use crate::events::types::DuplicateEventRequest;
use crate::pages::queries as page_queries;
use crate::permissions::{
    add_organiser, require_event_permission, EventPermissions, PermissionError,
};

async fn resolve_event(state: &AppState, event_slug: &str) -> EventResult<Event> {
    db_queries::find_event_by_slug(&state.db, event_slug)
        .await?
        .ok_or(EventError::NotFound)
}

/// Failed permission checks surface as 404, matching the pages endpoints.
async fn check_update_event(state: &AppState, event: &Event, user: &AuthUser) -> EventResult<()> {
    require_event_permission(&state.db, event.id, user.id, EventPermissions::UPDATE_EVENT)
        .await
        .map_err(|e| match e {
            PermissionError::NotOrganiser | PermissionError::MissingPermission(_) => {
                EventError::NotFound
            }
            PermissionError::Database(msg) => {
                error!("permission check failed for event {}: {msg}", event.slug);
                EventError::Internal("permission check failed".to_string())
            }
        })
}

/// Delete an event and all of its pages.
///
/// Pages are removed explicitly inside the transaction; there is no
/// cascade from events to pages.
#[utoipa::path(
    delete,
    path = "/api/events/{event}",
    tag = "events",
    params(("event" = String, Path, description = "Event slug")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found"),
    ),
    security(("bearer_auth" = [])),
)]
pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_slug): Path<String>,
) -> EventResult<StatusCode> {
    let event = resolve_event(&state, &event_slug).await?;
    check_update_event(&state, &event, &user).await?;

    let mut tx = state.db.begin().await?;
    let removed = page_queries::delete_all_for_event(&mut tx, event.id).await?;
    db_queries::delete_event(&mut *tx, event.id).await?;
    tx.commit().await?;

    tracing::info!(event = %event.slug, pages = removed, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Duplicate an event, copying its pages in order.
///
/// The copies keep slug, content, and flags; positions are renumbered to a
/// fresh contiguous sequence. The caller becomes an organizer of the copy.
#[utoipa::path(
    post,
    path = "/api/events/{event}/duplicate",
    tag = "events",
    params(("event" = String, Path, description = "Event slug")),
    request_body = DuplicateEventRequest,
    responses(
        (status = 201, description = "Duplicated event", body = Event),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event slug already in use"),
    ),
    security(("bearer_auth" = [])),
)]
pub async fn duplicate_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_slug): Path<String>,
    Json(req): Json<DuplicateEventRequest>,
) -> EventResult<(StatusCode, Json<Event>)> {
    let event = resolve_event(&state, &event_slug).await?;
    check_update_event(&state, &event, &user).await?;

    if req.slug.is_empty() || !req.slug.chars().all(crate::pages::is_valid_slug_char) {
        return Err(EventError::Validation("invalid event slug".to_string()));
    }
    if req.name.trim().is_empty() {
        return Err(EventError::Validation("name must not be empty".to_string()));
    }
    if db_queries::find_event_by_slug(&state.db, &req.slug)
        .await?
        .is_some()
    {
        return Err(EventError::DuplicateSlug);
    }

    let mut tx = state.db.begin().await?;
    let copy =
        db_queries::insert_event(&mut *tx, &req.slug, &req.name, &event.locale, user.id).await?;
    let copied =
        page_queries::clone_pages_for_event(&mut tx, event.id, copy.id, user.id).await?;
    tx.commit().await?;

    add_organiser(
        &state.db,
        copy.id,
        user.id,
        EventPermissions::ORGANIZER_DEFAULT,
    )
    .await?;

    tracing::info!(source = %event.slug, target = %copy.slug, pages = copied, "event duplicated");
    Ok((StatusCode::CREATED, Json(copy)))
}
