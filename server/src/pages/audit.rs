//! Audit trail for page management actions.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

pub const ACTION_PAGE_ADDED: &str = "pages.page.added";
pub const ACTION_PAGE_CHANGED: &str = "pages.page.changed";
pub const ACTION_PAGE_DELETED: &str = "pages.page.deleted";

/// Writes audit entries for page mutations.
///
/// Entries keep the page id rather than a foreign key so the trail survives
/// page deletion.
#[derive(Clone)]
pub struct AuditLog {
    pool: PgPool,
}

impl AuditLog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn record(
        &self,
        event_id: Uuid,
        page_id: Uuid,
        action: &str,
        actor_id: Uuid,
        changes: &Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO page_audit_log (id, event_id, page_id, action, actor_id, changes)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(Uuid::now_v7())
        .bind(event_id)
        .bind(page_id)
        .bind(action)
        .bind(actor_id)
        .bind(changes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record an entry; failures are logged and never fail the request.
    pub async fn record_or_log(
        &self,
        event_id: Uuid,
        page_id: Uuid,
        action: &str,
        actor_id: Uuid,
        changes: Value,
    ) {
        if let Err(e) = self
            .record(event_id, page_id, action, actor_id, &changes)
            .await
        {
            tracing::error!(
                %event_id,
                %page_id,
                action,
                "failed to write audit entry: {e}"
            );
        }
    }
}
