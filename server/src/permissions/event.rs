//! Event-level organizer permissions using bitflags.
//!
//! Permissions are organized into categories:
//! - Event Management (bits 0-1): Settings and team administration
//! - Content (bits 2-4): Submissions, schedule, and pages

use bitflags::bitflags;

bitflags! {
    /// Organizer permissions represented as a 64-bit bitfield.
    ///
    /// Stored as BIGINT in PostgreSQL for efficient database operations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct EventPermissions: u64 {
        // === Event Management (bits 0-1) ===
        /// Permission to modify event settings and lifecycle (duplicate, delete)
        const UPDATE_EVENT       = 1 << 0;
        /// Permission to manage the organizer team
        const MANAGE_TEAM        = 1 << 1;

        // === Content (bits 2-4) ===
        /// Permission to review and manage talk submissions
        const MANAGE_SUBMISSIONS = 1 << 2;
        /// Permission to edit the published schedule
        const MANAGE_SCHEDULE    = 1 << 3;
        /// Permission to create, edit, delete, and reorder event pages
        const MANAGE_PAGES       = 1 << 4;
    }
}

impl EventPermissions {
    /// Default permissions for a reviewer-level organizer.
    pub const REVIEWER_DEFAULT: Self = Self::MANAGE_SUBMISSIONS;

    /// Default permissions for a full organizer.
    pub const ORGANIZER_DEFAULT: Self = Self::UPDATE_EVENT
        .union(Self::MANAGE_SUBMISSIONS)
        .union(Self::MANAGE_SCHEDULE)
        .union(Self::MANAGE_PAGES);

    /// Check if this permission set contains the given permission.
    #[must_use]
    pub const fn has(self, permission: Self) -> bool {
        self.contains(permission)
    }

    /// Convert to the BIGINT representation stored in the database.
    #[must_use]
    pub const fn to_db(self) -> i64 {
        self.bits() as i64
    }

    /// Load from the BIGINT representation stored in the database.
    ///
    /// Unknown bits are dropped so that rows written by newer versions
    /// still load.
    #[must_use]
    pub const fn from_db(bits: i64) -> Self {
        Self::from_bits_truncate(bits as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_bits_are_stable() {
        assert_eq!(EventPermissions::UPDATE_EVENT.bits(), 1);
        assert_eq!(EventPermissions::MANAGE_PAGES.bits(), 1 << 4);
    }

    #[test]
    fn test_organizer_default_can_manage_pages() {
        assert!(EventPermissions::ORGANIZER_DEFAULT.has(EventPermissions::MANAGE_PAGES));
        assert!(!EventPermissions::REVIEWER_DEFAULT.has(EventPermissions::MANAGE_PAGES));
    }

    #[test]
    fn test_db_round_trip() {
        let perms = EventPermissions::ORGANIZER_DEFAULT;
        assert_eq!(EventPermissions::from_db(perms.to_db()), perms);
    }

    #[test]
    fn test_unknown_bits_are_dropped() {
        let raw = EventPermissions::MANAGE_PAGES.to_db() | (1 << 40);
        assert_eq!(EventPermissions::from_db(raw), EventPermissions::MANAGE_PAGES);
    }
}
