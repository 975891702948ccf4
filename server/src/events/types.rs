//! Request types for event lifecycle endpoints.

use serde::Deserialize;

/// Request body for duplicating an event.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DuplicateEventRequest {
    /// Slug for the new event.
    pub slug: String,
    /// Display name for the new event.
    pub name: String,
}
