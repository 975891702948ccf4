//! Event lifecycle endpoints that interact with pages.

pub mod error;
pub mod handlers;
pub mod types;

pub use error::{EventError, EventResult};
pub use types::DuplicateEventRequest;
