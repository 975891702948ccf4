//! Constants for event pages.

/// Maximum slug length in characters.
pub const MAX_SLUG_LENGTH: usize = 150;

/// Maximum title length in characters (per locale value).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum body size in bytes (per locale value, 100KB).
pub const MAX_BODY_SIZE: usize = 102_400;

/// Characters allowed in a page slug.
///
/// Slugs become path segments of public URLs, so the set is restricted to
/// latin letters, digits, dots and dashes. Case is preserved on storage but
/// lookups and uniqueness are case-insensitive.
#[must_use]
pub fn is_valid_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}
