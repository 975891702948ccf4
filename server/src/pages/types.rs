//! Types for event pages.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Localized text stored as a `locale -> value` map (JSONB in the database).
///
/// Deserializes from either a map (`{"en": "Imprint", "de": "Impressum"}`)
/// or a bare string, which is treated as the English value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Plain(String),
            Map(BTreeMap<String, String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Plain(value) => Self::from(value.as_str()),
            Repr::Map(map) => Self(map),
        })
    }
}

impl From<&str> for LocalizedText {
    fn from(value: &str) -> Self {
        Self(BTreeMap::from([("en".to_string(), value.to_string())]))
    }
}

impl LocalizedText {
    /// Resolve the value for a locale, falling back to English and then to
    /// any available value.
    #[must_use]
    pub fn localize(&self, locale: &str) -> &str {
        self.0
            .get(locale)
            .or_else(|| self.0.get("en"))
            .or_else(|| self.0.values().next())
            .map_or("", String::as_str)
    }

    /// True when no locale carries a non-whitespace value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }
}

/// Full page data including content.
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
pub struct Page {
    pub id: Uuid,
    pub event_id: Uuid,
    pub slug: String,
    /// Display order within the event; lower values come first.
    pub position: i32,
    #[schema(value_type = LocalizedText)]
    pub title: Json<LocalizedText>,
    /// Markdown source of the page body.
    #[schema(value_type = LocalizedText)]
    pub body: Json<LocalizedText>,
    pub show_on_frontpage: bool,
    pub show_in_footer: bool,
    /// Whether users must acknowledge this page before acting
    /// (e.g. a code of conduct).
    pub require_confirmation: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Page metadata for the organizer list (without body for efficiency).
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PageListItem {
    pub id: Uuid,
    pub slug: String,
    pub position: i32,
    pub title: LocalizedText,
    pub show_on_frontpage: bool,
    pub show_in_footer: bool,
    pub require_confirmation: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&Page> for PageListItem {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id,
            slug: page.slug.clone(),
            position: page.position,
            title: page.title.0.clone(),
            show_on_frontpage: page.show_on_frontpage,
            show_in_footer: page.show_in_footer,
            require_confirmation: page.require_confirmation,
            updated_at: page.updated_at,
        }
    }
}

/// Request body for creating a new page.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePageRequest {
    /// URL-friendly slug; immutable after creation.
    pub slug: String,
    /// Localized page title (required).
    pub title: LocalizedText,
    /// Localized markdown body (required).
    pub body: LocalizedText,
    /// Show a link on the event start page (default: false).
    pub show_on_frontpage: Option<bool>,
    /// Show a link in the event footer (default: false).
    pub show_in_footer: Option<bool>,
    /// Require acknowledgement before user actions (default: false).
    pub require_confirmation: Option<bool>,
}

/// Request body for updating an existing page.
///
/// The slug is immutable; unknown fields (including `slug`) are rejected.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePageRequest {
    /// New title (optional).
    pub title: Option<LocalizedText>,
    /// New body (optional).
    pub body: Option<LocalizedText>,
    /// New frontpage flag (optional).
    pub show_on_frontpage: Option<bool>,
    /// New footer flag (optional).
    pub show_in_footer: Option<bool>,
    /// New confirmation flag (optional).
    pub require_confirmation: Option<bool>,
}

/// Public rendering of a page for visitors.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PageView {
    pub slug: String,
    /// Title resolved to the requested locale.
    pub title: String,
    /// Sanitized HTML rendered from the markdown body.
    pub content: String,
    pub require_confirmation: bool,
}

/// A navigation link derived from a flagged page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct PageLink {
    /// Localized page title.
    pub label: String,
    /// Absolute URL of the public page.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localize_prefers_requested_locale() {
        let text = LocalizedText(BTreeMap::from([
            ("de".to_string(), "Impressum".to_string()),
            ("en".to_string(), "Imprint".to_string()),
        ]));
        assert_eq!(text.localize("de"), "Impressum");
        assert_eq!(text.localize("en"), "Imprint");
    }

    #[test]
    fn test_localize_falls_back_to_english_then_any() {
        let text = LocalizedText(BTreeMap::from([
            ("de".to_string(), "Impressum".to_string()),
            ("en".to_string(), "Imprint".to_string()),
        ]));
        assert_eq!(text.localize("fr"), "Imprint");

        let german_only =
            LocalizedText(BTreeMap::from([("de".to_string(), "Impressum".to_string())]));
        assert_eq!(german_only.localize("fr"), "Impressum");

        assert_eq!(LocalizedText::default().localize("en"), "");
    }

    #[test]
    fn test_deserialize_plain_string_becomes_english() {
        let text: LocalizedText = serde_json::from_str(r#""Imprint""#).unwrap();
        assert_eq!(text.localize("en"), "Imprint");
    }

    #[test]
    fn test_deserialize_map() {
        let text: LocalizedText = serde_json::from_str(r#"{"de":"Impressum"}"#).unwrap();
        assert_eq!(text.localize("de"), "Impressum");
    }

    #[test]
    fn test_is_blank() {
        assert!(LocalizedText::default().is_blank());
        assert!(LocalizedText::from("   ").is_blank());
        assert!(!LocalizedText::from("Imprint").is_blank());
    }

    #[test]
    fn test_update_request_rejects_slug_field() {
        let result: Result<UpdatePageRequest, _> =
            serde_json::from_str(r#"{"slug":"new-slug"}"#);
        assert!(result.is_err(), "slug is immutable after creation");
    }
}
