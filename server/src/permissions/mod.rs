//! Permission system types and utilities.
//!
//! Organizer access is modelled per event: the event owner holds every
//! permission, and organizer-team members carry a permission bitfield.

mod event;
mod queries;

pub use event::EventPermissions;
pub use queries::{
    add_organiser, get_event_permissions, require_event_permission, PermissionError,
};
