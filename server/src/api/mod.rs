//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth, config::Config, events, pages, pages::AuditLog};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
    /// Audit trail writer
    pub audit: AuditLog,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db: PgPool, config: Config) -> Self {
        let audit = AuditLog::new(db.clone());
        Self {
            db,
            config: Arc::new(config),
            audit,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Organizer routes that require authentication
    let protected_routes = Router::new()
        .nest("/api/events/{event}/pages", pages::orga_pages_router())
        .route("/api/events/{event}", delete(events::handlers::delete_event))
        .route(
            "/api/events/{event}/duplicate",
            post(events::handlers::duplicate_event),
        )
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Protected organizer routes
        .merge(protected_routes)
        // Public page routes
        .route(
            "/api/events/{event}/page/{slug}",
            get(pages::handlers::show_page),
        )
        .route(
            "/api/events/{event}/footer-links",
            get(pages::handlers::footer_links),
        )
        .route(
            "/api/events/{event}/frontpage-links",
            get(pages::handlers::frontpage_links),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
