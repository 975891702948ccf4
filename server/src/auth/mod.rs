//! Authentication
//!
//! Bearer-token validation for organizer endpoints. Account registration and
//! token issuance live in the platform core; this service validates tokens
//! signed with the shared secret.

mod error;
pub mod jwt;
mod middleware;

pub use error::{AuthError, AuthResult, ErrorResponse};
pub use middleware::{require_auth, AuthUser};
