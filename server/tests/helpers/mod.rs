//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full
//! axum router, plus utilities for user/event creation and JWT generation.
//!
//! ## Shared Resources
//!
//! Use [`shared_pool()`] to avoid creating new connections per test.
//!
//! ## Cleanup Guards
//!
//! Use [`CleanupGuard`] for RAII-based cleanup that runs even if a test panics.
#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use confera_pages::api::{create_router, AppState};
use confera_pages::auth::jwt;
use confera_pages::config::Config;
use confera_pages::db;
use confera_pages::permissions::{add_organiser, EventPermissions};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

/// Shared config across all tests in the same binary.
static SHARED_CONFIG: OnceCell<Config> = OnceCell::const_new();

/// Get a database pool for the current test.
///
/// Each `#[tokio::test]` gets its own runtime that is dropped when the test
/// ends, which would shut down the IO driver of any connection held by a
/// pool shared across tests. A fresh pool per test keeps every connection
/// on the runtime that drives it; the pool is leaked to keep the `'static`
/// borrow used throughout the tests.
pub async fn shared_pool() -> &'static PgPool {
    let config = shared_config().await;
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to test DB");
    Box::leak(Box::new(pool))
}

/// Get or create a shared config.
pub async fn shared_config() -> &'static Config {
    SHARED_CONFIG
        .get_or_init(|| async { Config::default_for_test() })
        .await
}

// ============================================================================
// Cleanup Guard
// ============================================================================

/// Async cleanup action type.
type CleanupAction = Box<dyn FnOnce(PgPool) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

/// RAII guard that runs cleanup actions on drop, even if the test panics.
pub struct CleanupGuard {
    pool: PgPool,
    actions: Vec<CleanupAction>,
}

impl CleanupGuard {
    /// Create a new cleanup guard for the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            actions: Vec::new(),
        }
    }

    /// Register a generic async cleanup action.
    pub fn add<F, Fut>(&mut self, action: F)
    where
        F: FnOnce(PgPool) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.actions
            .push(Box::new(move |pool| Box::pin(action(pool))));
    }

    /// Register cleanup to delete a user by ID.
    pub fn delete_user(&mut self, user_id: Uuid) {
        self.add(move |pool| async move {
            let _ = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user_id)
                .execute(&pool)
                .await;
        });
    }

    /// Register cleanup to delete an event and its pages by ID.
    pub fn delete_event(&mut self, event_id: Uuid) {
        self.add(move |pool| async move {
            let _ = sqlx::query("DELETE FROM pages WHERE event_id = $1")
                .bind(event_id)
                .execute(&pool)
                .await;
            let _ = sqlx::query("DELETE FROM page_audit_log WHERE event_id = $1")
                .bind(event_id)
                .execute(&pool)
                .await;
            let _ = sqlx::query("DELETE FROM events WHERE id = $1")
                .bind(event_id)
                .execute(&pool)
                .await;
        });
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let actions = std::mem::take(&mut self.actions);
        if actions.is_empty() {
            return;
        }

        let pool = self.pool.clone();
        let handle = tokio::runtime::Handle::current();

        // Spawn a blocking thread to run async cleanup.
        // This works regardless of tokio runtime flavor.
        std::thread::spawn(move || {
            handle.block_on(async move {
                for action in actions {
                    action(pool.clone()).await;
                }
            });
        })
        .join()
        .expect("Cleanup thread panicked");
    }
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a new test app using the shared DB connection.
    pub async fn new() -> Self {
        let pool = shared_pool().await.clone();
        let config = shared_config().await.clone();
        Self::build(pool, config)
    }

    /// Create a test app with a custom config (for limit testing).
    pub async fn with_config(config: Config) -> Self {
        let pool = shared_pool().await.clone();
        Self::build(pool, config)
    }

    fn build(pool: PgPool, config: Config) -> Self {
        let state = AppState::new(pool.clone(), config.clone());
        let router = create_router(state);
        Self {
            router,
            pool,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Create a [`CleanupGuard`] for this app's pool.
    pub fn cleanup_guard(&self) -> CleanupGuard {
        CleanupGuard::new(self.pool.clone())
    }
}

// ============================================================================
// User, event, and auth helpers
// ============================================================================

/// Create a test user and return `(user_id, username)`.
pub async fn create_test_user(pool: &PgPool) -> (Uuid, String) {
    let test_id = Uuid::new_v4().to_string()[..8].to_string();
    let username = format!("httptest_{test_id}");
    let user_id = Uuid::now_v7();

    sqlx::query("INSERT INTO users (id, username, display_name) VALUES ($1, $2, 'HTTP Test User')")
        .bind(user_id)
        .bind(&username)
        .execute(pool)
        .await
        .expect("Failed to create test user");

    (user_id, username)
}

/// Create a test event owned by the given user and return `(event_id, slug)`.
pub async fn create_test_event(pool: &PgPool, owner_id: Uuid) -> (Uuid, String) {
    let event_id = Uuid::now_v7();
    let slug = format!("testevent-{}", &event_id.to_string()[..8]);

    sqlx::query(
        "INSERT INTO events (id, slug, name, locale, created_by) VALUES ($1, $2, 'Test Event', 'en', $3)",
    )
    .bind(event_id)
    .bind(&slug)
    .bind(owner_id)
    .execute(pool)
    .await
    .expect("Failed to create test event");

    (event_id, slug)
}

/// Add a user to the event's organizer team with the given permissions.
pub async fn make_organiser(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
    permissions: EventPermissions,
) {
    add_organiser(pool, event_id, user_id, permissions)
        .await
        .expect("Failed to add organiser");
}

/// Generate an access token for the given user.
pub fn generate_access_token(config: &Config, user_id: Uuid) -> String {
    jwt::generate_access_token(user_id, &config.jwt_secret, config.jwt_access_expiry)
        .expect("Failed to generate access token")
}

/// Insert a page row directly and return its ID.
pub async fn insert_page(
    pool: &PgPool,
    event_id: Uuid,
    slug: &str,
    position: i32,
    created_by: Uuid,
) -> Uuid {
    let page_id = Uuid::now_v7();
    sqlx::query(
        r#"INSERT INTO pages (id, event_id, slug, position, title, body, created_by, updated_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)"#,
    )
    .bind(page_id)
    .bind(event_id)
    .bind(slug)
    .bind(position)
    .bind(serde_json::json!({ "en": slug }))
    .bind(serde_json::json!({ "en": format!("Body of {slug}") }))
    .bind(created_by)
    .execute(pool)
    .await
    .expect("Failed to insert page");
    page_id
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}
