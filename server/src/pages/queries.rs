//! Database queries for event pages.

use sqlx::PgPool;
use uuid::Uuid;

use crate::pages::{
    error::{PageError, PageResult},
    ordering::{plan_move, MoveDirection, OrderEntry},
    types::{LocalizedText, Page},
    MAX_BODY_SIZE, MAX_SLUG_LENGTH, MAX_TITLE_LENGTH,
};

/// Validate a slug against the allowed charset and length.
pub fn validate_slug(slug: &str) -> PageResult<()> {
    if slug.is_empty() || !slug.chars().all(super::is_valid_slug_char) {
        return Err(PageError::InvalidSlug);
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(PageError::Validation(format!(
            "slug must be at most {MAX_SLUG_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate title and body sizes for create/update payloads.
pub fn validate_content(title: Option<&LocalizedText>, body: Option<&LocalizedText>) -> PageResult<()> {
    if let Some(title) = title {
        if title.is_blank() {
            return Err(PageError::Validation("title must not be empty".to_string()));
        }
        if title.0.values().any(|t| t.len() > MAX_TITLE_LENGTH) {
            return Err(PageError::Validation(format!(
                "title must be at most {MAX_TITLE_LENGTH} characters"
            )));
        }
    }
    if let Some(body) = body {
        if body.0.values().any(|b| b.len() > MAX_BODY_SIZE) {
            return Err(PageError::Validation(format!(
                "body must be at most {MAX_BODY_SIZE} bytes"
            )));
        }
    }
    Ok(())
}

/// Check whether a slug is taken within an event, case-insensitively.
pub async fn slug_exists(pool: &PgPool, event_id: Uuid, slug: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r"SELECT EXISTS(
            SELECT 1 FROM pages WHERE event_id = $1 AND lower(slug) = lower($2)
        )",
    )
    .bind(event_id)
    .bind(slug)
    .fetch_one(pool)
    .await
}

/// Count pages for an event.
pub async fn count_pages(pool: &PgPool, event_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(r"SELECT COUNT(*) FROM pages WHERE event_id = $1")
        .bind(event_id)
        .fetch_one(pool)
        .await
}

async fn max_position(pool: &PgPool, event_id: Uuid) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i32>>(r"SELECT MAX(position) FROM pages WHERE event_id = $1")
        .bind(event_id)
        .fetch_one(pool)
        .await
}

/// Create a page at the end of the event's display order.
///
/// The unique index on `(event_id, lower(slug))` is the authority on slug
/// collisions; a violation maps to `DuplicateSlug` so concurrent creates
/// that race past the caller's existence check still surface as 409.
pub async fn create_page(
    pool: &PgPool,
    event_id: Uuid,
    slug: &str,
    title: &LocalizedText,
    body: &LocalizedText,
    show_on_frontpage: bool,
    show_in_footer: bool,
    require_confirmation: bool,
    created_by: Uuid,
) -> PageResult<Page> {
    let position = max_position(pool, event_id).await?.map_or(0, |p| p + 1);

    sqlx::query_as::<_, Page>(
        r"
        INSERT INTO pages (
            id, event_id, slug, position, title, body,
            show_on_frontpage, show_in_footer, require_confirmation,
            created_by, updated_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING *
        ",
    )
    .bind(Uuid::now_v7())
    .bind(event_id)
    .bind(slug)
    .bind(position)
    .bind(sqlx::types::Json(title))
    .bind(sqlx::types::Json(body))
    .bind(show_on_frontpage)
    .bind(show_in_footer)
    .bind(require_confirmation)
    .bind(created_by)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            PageError::DuplicateSlug
        } else {
            PageError::Database(e)
        }
    })
}

/// Look up a page by slug within an event, case-insensitively.
pub async fn get_page(
    pool: &PgPool,
    event_id: Uuid,
    slug: &str,
) -> Result<Option<Page>, sqlx::Error> {
    sqlx::query_as::<_, Page>(
        r"SELECT * FROM pages WHERE event_id = $1 AND lower(slug) = lower($2)",
    )
    .bind(event_id)
    .bind(slug)
    .fetch_optional(pool)
    .await
}

/// List an event's pages in display order.
///
/// Equal positions are broken by the title in the given locale, so the
/// ordering stays stable even when positions carry duplicates.
pub async fn list_pages(
    pool: &PgPool,
    event_id: Uuid,
    locale: &str,
) -> Result<Vec<Page>, sqlx::Error> {
    let mut pages = sqlx::query_as::<_, Page>(
        r"SELECT * FROM pages WHERE event_id = $1 ORDER BY position",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    pages.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.title.localize(locale).cmp(&b.title.localize(locale)))
    });
    Ok(pages)
}

/// Apply a partial update to a page. The slug is never touched here.
#[allow(clippy::too_many_arguments)]
pub async fn update_page(
    pool: &PgPool,
    page: &Page,
    title: Option<&LocalizedText>,
    body: Option<&LocalizedText>,
    show_on_frontpage: Option<bool>,
    show_in_footer: Option<bool>,
    require_confirmation: Option<bool>,
    updated_by: Uuid,
) -> Result<Page, sqlx::Error> {
    let new_title = title.unwrap_or(&page.title.0);
    let new_body = body.unwrap_or(&page.body.0);
    let new_frontpage = show_on_frontpage.unwrap_or(page.show_on_frontpage);
    let new_footer = show_in_footer.unwrap_or(page.show_in_footer);
    let new_confirmation = require_confirmation.unwrap_or(page.require_confirmation);

    sqlx::query_as::<_, Page>(
        r"
        UPDATE pages SET
            title = $2, body = $3,
            show_on_frontpage = $4, show_in_footer = $5, require_confirmation = $6,
            updated_by = $7, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(page.id)
    .bind(sqlx::types::Json(new_title))
    .bind(sqlx::types::Json(new_body))
    .bind(new_frontpage)
    .bind(new_footer)
    .bind(new_confirmation)
    .bind(updated_by)
    .fetch_one(pool)
    .await
}

/// Delete a page. Remaining positions keep their gaps until the next move.
pub async fn delete_page(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(r"DELETE FROM pages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete every page of an event. Runs inside the caller's transaction so
/// event deletion stays atomic.
pub async fn delete_all_for_event(
    tx: &mut sqlx::PgConnection,
    event_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r"DELETE FROM pages WHERE event_id = $1")
        .bind(event_id)
        .execute(tx)
        .await?;
    Ok(result.rows_affected())
}

/// Copy every page of one event to another, renumbering positions to a
/// fresh contiguous `0..N-1` while preserving relative order.
pub async fn clone_pages_for_event(
    tx: &mut sqlx::PgConnection,
    source_event_id: Uuid,
    target_event_id: Uuid,
    actor_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let pages = sqlx::query_as::<_, Page>(
        r"SELECT * FROM pages WHERE event_id = $1 ORDER BY position",
    )
    .bind(source_event_id)
    .fetch_all(&mut *tx)
    .await?;

    let mut copied = 0;
    for (position, page) in pages.iter().enumerate() {
        sqlx::query(
            r"
            INSERT INTO pages (
                id, event_id, slug, position, title, body,
                show_on_frontpage, show_in_footer, require_confirmation,
                created_by, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ",
        )
        .bind(Uuid::now_v7())
        .bind(target_event_id)
        .bind(&page.slug)
        .bind(position as i32)
        .bind(&page.title)
        .bind(&page.body)
        .bind(page.show_on_frontpage)
        .bind(page.show_in_footer)
        .bind(page.require_confirmation)
        .bind(actor_id)
        .execute(&mut *tx)
        .await?;
        copied += 1;
    }
    Ok(copied)
}

/// Move a page one step up or down in display order.
///
/// The whole sequence is read under `FOR UPDATE` so concurrent moves on the
/// same event serialize, then re-normalized to contiguous positions.
pub async fn move_page(
    pool: &PgPool,
    event_id: Uuid,
    slug: &str,
    direction: MoveDirection,
    locale: &str,
) -> PageResult<()> {
    let mut tx = pool.begin().await?;

    let mut pages = sqlx::query_as::<_, Page>(
        r"SELECT * FROM pages WHERE event_id = $1 ORDER BY position FOR UPDATE",
    )
    .bind(event_id)
    .fetch_all(&mut *tx)
    .await?;

    pages.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.title.localize(locale).cmp(&b.title.localize(locale)))
    });

    let target = pages
        .iter()
        .position(|p| p.slug.eq_ignore_ascii_case(slug))
        .ok_or(PageError::NotFound)?;

    let ordered: Vec<OrderEntry> = pages
        .iter()
        .map(|p| OrderEntry {
            id: p.id,
            position: p.position,
        })
        .collect();

    for change in plan_move(&ordered, target, direction) {
        sqlx::query(r"UPDATE pages SET position = $2 WHERE id = $1")
            .bind(change.id)
            .bind(change.position)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}
