//! API handlers for event pages.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db::models::Event;
use crate::db::queries::find_event_by_slug;
use crate::pages::{
    audit, links, queries, render,
    error::{PageError, PageResult},
    ordering::MoveDirection,
    types::{Page, PageLink, PageListItem, PageView},
    CreatePageRequest, UpdatePageRequest,
};
use crate::permissions::{require_event_permission, EventPermissions, PermissionError};

/// Optional locale override for public page rendering.
#[derive(Debug, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

/// Resolve an event slug, or 404.
async fn resolve_event(state: &AppState, event_slug: &str) -> PageResult<Event> {
    find_event_by_slug(&state.db, event_slug)
        .await?
        .ok_or(PageError::NotFound)
}

/// Ensure the caller may manage pages for this event.
///
/// Failed checks surface as 404 rather than 403 so the management URLs do
/// not reveal which events exist to non-organizers.
async fn check_manage_pages(state: &AppState, event: &Event, user: &AuthUser) -> PageResult<()> {
    require_event_permission(&state.db, event.id, user.id, EventPermissions::MANAGE_PAGES)
        .await
        .map_err(|e| match e {
            PermissionError::NotOrganiser | PermissionError::MissingPermission(_) => {
                PageError::NotFound
            }
            PermissionError::Database(msg) => {
                error!("permission check failed for event {}: {msg}", event.slug);
                PageError::Internal("permission check failed".to_string())
            }
        })
}

fn page_snapshot(page: &Page) -> serde_json::Value {
    json!({
        "slug": page.slug,
        "title": page.title.0,
        "body": page.body.0,
        "position": page.position,
        "show_on_frontpage": page.show_on_frontpage,
        "show_in_footer": page.show_in_footer,
        "require_confirmation": page.require_confirmation,
    })
}

// ============================================================================
// Organizer endpoints
// ============================================================================

/// List an event's pages in display order.
#[utoipa::path(
    get,
    path = "/api/events/{event}/pages",
    tag = "pages",
    params(("event" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Pages in display order", body = Vec<PageListItem>),
        (status = 404, description = "Event not found or not manageable"),
    ),
    security(("bearer_auth" = [])),
)]
pub async fn list_pages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_slug): Path<String>,
) -> PageResult<Json<Vec<PageListItem>>> {
    let event = resolve_event(&state, &event_slug).await?;
    check_manage_pages(&state, &event, &user).await?;

    let pages = queries::list_pages(&state.db, event.id, &event.locale).await?;
    Ok(Json(pages.iter().map(PageListItem::from).collect()))
}

/// Create a page at the end of the event's display order.
#[utoipa::path(
    post,
    path = "/api/events/{event}/pages",
    tag = "pages",
    params(("event" = String, Path, description = "Event slug")),
    request_body = CreatePageRequest,
    responses(
        (status = 201, description = "Page created", body = Page),
        (status = 400, description = "Invalid slug or content"),
        (status = 409, description = "Slug already in use"),
    ),
    security(("bearer_auth" = [])),
)]
pub async fn create_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_slug): Path<String>,
    Json(req): Json<CreatePageRequest>,
) -> PageResult<(StatusCode, Json<Page>)> {
    let event = resolve_event(&state, &event_slug).await?;
    check_manage_pages(&state, &event, &user).await?;

    queries::validate_slug(&req.slug)?;
    queries::validate_content(Some(&req.title), Some(&req.body))?;

    if queries::slug_exists(&state.db, event.id, &req.slug).await? {
        return Err(PageError::DuplicateSlug);
    }

    let limit = state.config.max_pages_per_event;
    if queries::count_pages(&state.db, event.id).await? >= limit {
        return Err(PageError::Validation(format!(
            "maximum of {limit} pages reached"
        )));
    }

    let page = queries::create_page(
        &state.db,
        event.id,
        &req.slug,
        &req.title,
        &req.body,
        req.show_on_frontpage.unwrap_or(false),
        req.show_in_footer.unwrap_or(false),
        req.require_confirmation.unwrap_or(false),
        user.id,
    )
    .await?;

    state
        .audit
        .record_or_log(
            event.id,
            page.id,
            audit::ACTION_PAGE_ADDED,
            user.id,
            page_snapshot(&page),
        )
        .await;

    Ok((StatusCode::CREATED, Json(page)))
}

/// Apply a partial update to a page. The slug cannot be changed.
#[utoipa::path(
    patch,
    path = "/api/events/{event}/pages/{slug}",
    tag = "pages",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("slug" = String, Path, description = "Page slug"),
    ),
    request_body = UpdatePageRequest,
    responses(
        (status = 200, description = "Updated page", body = Page),
        (status = 400, description = "Invalid content"),
        (status = 404, description = "Page not found"),
    ),
    security(("bearer_auth" = [])),
)]
pub async fn update_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path((event_slug, slug)): Path<(String, String)>,
    Json(req): Json<UpdatePageRequest>,
) -> PageResult<Json<Page>> {
    let event = resolve_event(&state, &event_slug).await?;
    check_manage_pages(&state, &event, &user).await?;

    let page = queries::get_page(&state.db, event.id, &slug)
        .await?
        .ok_or(PageError::NotFound)?;

    queries::validate_content(req.title.as_ref(), req.body.as_ref())?;

    let updated = queries::update_page(
        &state.db,
        &page,
        req.title.as_ref(),
        req.body.as_ref(),
        req.show_on_frontpage,
        req.show_in_footer,
        req.require_confirmation,
        user.id,
    )
    .await?;

    // Audit only the fields the request actually carried.
    let mut changes = serde_json::Map::new();
    if req.title.is_some() {
        changes.insert("title".to_string(), json!(updated.title.0));
    }
    if req.body.is_some() {
        changes.insert("body".to_string(), json!(updated.body.0));
    }
    if req.show_on_frontpage.is_some() {
        changes.insert("show_on_frontpage".to_string(), json!(updated.show_on_frontpage));
    }
    if req.show_in_footer.is_some() {
        changes.insert("show_in_footer".to_string(), json!(updated.show_in_footer));
    }
    if req.require_confirmation.is_some() {
        changes.insert(
            "require_confirmation".to_string(),
            json!(updated.require_confirmation),
        );
    }
    state
        .audit
        .record_or_log(
            event.id,
            updated.id,
            audit::ACTION_PAGE_CHANGED,
            user.id,
            serde_json::Value::Object(changes),
        )
        .await;

    Ok(Json(updated))
}

/// Delete a page. Positions of the remaining pages are left untouched.
#[utoipa::path(
    delete,
    path = "/api/events/{event}/pages/{slug}",
    tag = "pages",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("slug" = String, Path, description = "Page slug"),
    ),
    responses(
        (status = 204, description = "Page deleted"),
        (status = 404, description = "Page not found"),
    ),
    security(("bearer_auth" = [])),
)]
pub async fn delete_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path((event_slug, slug)): Path<(String, String)>,
) -> PageResult<StatusCode> {
    let event = resolve_event(&state, &event_slug).await?;
    check_manage_pages(&state, &event, &user).await?;

    let page = queries::get_page(&state.db, event.id, &slug)
        .await?
        .ok_or(PageError::NotFound)?;

    queries::delete_page(&state.db, page.id).await?;

    state
        .audit
        .record_or_log(
            event.id,
            page.id,
            audit::ACTION_PAGE_DELETED,
            user.id,
            page_snapshot(&page),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}

async fn move_page(
    state: &AppState,
    user: &AuthUser,
    event_slug: &str,
    slug: &str,
    direction: MoveDirection,
) -> PageResult<StatusCode> {
    let event = resolve_event(state, event_slug).await?;
    check_manage_pages(state, &event, user).await?;

    queries::move_page(&state.db, event.id, slug, direction, &event.locale).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a page one step towards the front of the display order.
///
/// Moving the first page up succeeds without effect.
#[utoipa::path(
    post,
    path = "/api/events/{event}/pages/{slug}/move-up",
    tag = "pages",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("slug" = String, Path, description = "Page slug"),
    ),
    responses(
        (status = 204, description = "Page moved"),
        (status = 404, description = "Page not found"),
    ),
    security(("bearer_auth" = [])),
)]
pub async fn move_page_up(
    State(state): State<AppState>,
    user: AuthUser,
    Path((event_slug, slug)): Path<(String, String)>,
) -> PageResult<StatusCode> {
    move_page(&state, &user, &event_slug, &slug, MoveDirection::Up).await
}

/// Move a page one step towards the back of the display order.
///
/// Moving the last page down succeeds without effect.
#[utoipa::path(
    post,
    path = "/api/events/{event}/pages/{slug}/move-down",
    tag = "pages",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("slug" = String, Path, description = "Page slug"),
    ),
    responses(
        (status = 204, description = "Page moved"),
        (status = 404, description = "Page not found"),
    ),
    security(("bearer_auth" = [])),
)]
pub async fn move_page_down(
    State(state): State<AppState>,
    user: AuthUser,
    Path((event_slug, slug)): Path<(String, String)>,
) -> PageResult<StatusCode> {
    move_page(&state, &user, &event_slug, &slug, MoveDirection::Down).await
}

// ============================================================================
// Public endpoints
// ============================================================================

/// Render a page for visitors.
#[utoipa::path(
    get,
    path = "/api/events/{event}/page/{slug}",
    tag = "pages",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("slug" = String, Path, description = "Page slug"),
        ("locale" = Option<String>, Query, description = "Locale override"),
    ),
    responses(
        (status = 200, description = "Rendered page", body = PageView),
        (status = 404, description = "Page not found"),
    ),
)]
pub async fn show_page(
    State(state): State<AppState>,
    Path((event_slug, slug)): Path<(String, String)>,
    Query(query): Query<LocaleQuery>,
) -> PageResult<Json<PageView>> {
    let event = resolve_event(&state, &event_slug).await?;
    let page = queries::get_page(&state.db, event.id, &slug)
        .await?
        .ok_or(PageError::NotFound)?;

    let locale = query.locale.as_deref().unwrap_or(&event.locale);
    Ok(Json(PageView {
        slug: page.slug.clone(),
        title: page.title.localize(locale).to_string(),
        content: render::render_page(page.body.localize(locale)),
        require_confirmation: page.require_confirmation,
    }))
}

async fn link_list(
    state: &AppState,
    event_slug: &str,
    locale: Option<&str>,
    pick: fn(&[Page], &str, &str, &str) -> Vec<PageLink>,
) -> PageResult<Json<Vec<PageLink>>> {
    let event = resolve_event(state, event_slug).await?;
    let pages = queries::list_pages(&state.db, event.id, &event.locale).await?;
    let locale = locale.unwrap_or(&event.locale);
    Ok(Json(pick(
        &pages,
        &state.config.base_url,
        &event.slug,
        locale,
    )))
}

/// Links to pages flagged for the event footer, in display order.
#[utoipa::path(
    get,
    path = "/api/events/{event}/footer-links",
    tag = "pages",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("locale" = Option<String>, Query, description = "Locale override"),
    ),
    responses(
        (status = 200, description = "Footer links", body = Vec<PageLink>),
        (status = 404, description = "Event not found"),
    ),
)]
pub async fn footer_links(
    State(state): State<AppState>,
    Path(event_slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> PageResult<Json<Vec<PageLink>>> {
    link_list(&state, &event_slug, query.locale.as_deref(), links::footer_links).await
}

/// Links to pages flagged for the event front page, in display order.
#[utoipa::path(
    get,
    path = "/api/events/{event}/frontpage-links",
    tag = "pages",
    params(
        ("event" = String, Path, description = "Event slug"),
        ("locale" = Option<String>, Query, description = "Locale override"),
    ),
    responses(
        (status = 200, description = "Frontpage links", body = Vec<PageLink>),
        (status = 404, description = "Event not found"),
    ),
)]
pub async fn frontpage_links(
    State(state): State<AppState>,
    Path(event_slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> PageResult<Json<Vec<PageLink>>> {
    link_list(&state, &event_slug, query.locale.as_deref(), links::frontpage_links).await
}
