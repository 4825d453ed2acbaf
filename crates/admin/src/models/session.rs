//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use winter_gifts_core::backend::{AdminIdentity, SessionToken};
use winter_gifts_core::{AdminRole, AdminUserId};

/// Session-stored admin identity.
///
/// The token is re-checked against the backend on every gated request, so a
/// revoked or expired token ends the session even though the cookie is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub identity: AdminIdentity,
    pub token: SessionToken,
}

impl CurrentAdmin {
    #[must_use]
    pub const fn id(&self) -> AdminUserId {
        self.identity.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    #[must_use]
    pub const fn role(&self) -> AdminRole {
        self.identity.role
    }

    /// Whether this admin may change donations and projects.
    #[must_use]
    pub const fn can_mutate(&self) -> bool {
        self.identity.role.can_mutate()
    }
}

/// Session keys for admin data.
pub mod session_keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Donations table view model.
    pub const TABLE_DONATIONS: &str = "table.donations";

    /// Projects table view model.
    pub const TABLE_PROJECTS: &str = "table.projects";
}
