//! Event pages module.
//!
//! Provides per-event static pages for things like an imprint, venue
//! directions, or a code of conduct:
//! - Localized title and body (Markdown, sanitized on render)
//! - Stable slug URLs, immutable after creation
//! - Manual display ordering with single-step moves
//! - Footer and frontpage link flags
//! - Audit logging

pub mod audit;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod links;
pub mod ordering;
pub mod queries;
pub mod render;
pub mod router;
pub mod types;

pub use audit::AuditLog;
pub use constants::*;
pub use error::{PageError, PageResult};
pub use router::orga_pages_router;
pub use types::*;
