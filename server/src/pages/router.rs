//! Router configuration for event pages.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use super::handlers;
use crate::api::AppState;

/// Organizer router (mounted at `/api/events/{event}/pages`, behind auth).
pub fn orga_pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_pages))
        .route("/", post(handlers::create_page))
        .route("/{slug}", patch(handlers::update_page))
        .route("/{slug}", delete(handlers::delete_page))
        .route("/{slug}/move-up", post(handlers::move_page_up))
        .route("/{slug}/move-down", post(handlers::move_page_down))
}
