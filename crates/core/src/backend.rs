//! Backend capability traits.
//!
//! The web tier never owns data: it reads snapshots from, and sends mutation
//! intents to, a backend. Each concern is a small trait so handlers only
//! depend on what they use; [`AdminBackend`] and [`SiteBackend`] bundle the
//! capabilities each binary needs and are held as `Arc<dyn ...>` in state.
//!
//! The production implementations live next to each binary and talk to
//! `PostgreSQL`. Tests substitute in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::types::{
    AdminRole, AdminUserId, Donation, DonationEdit, DonationId, DonationStatus, Email,
    NewDonation, Project, ProjectDraft, ProjectId,
};

/// Errors reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The addressed record does not exist (or no longer exists).
    #[error("not found: {0}")]
    NotFound(String),

    /// The write conflicts with existing data, e.g. a duplicate slug.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend rejected the input.
    #[error("invalid: {0}")]
    Invalid(String),

    /// The backend could not be reached or failed internally.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Whether the failure is the caller's fault rather than the backend's.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Conflict(_) | Self::Invalid(_))
    }
}

/// Opaque admin session token issued by the backend at login.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs.
impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Who an admin session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
}

/// A freshly issued admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminGrant {
    pub token: SessionToken,
    pub identity: AdminIdentity,
    pub expires_at: DateTime<Utc>,
}

/// Result of a newsletter subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Created,
    AlreadySubscribed,
}

/// Admin login sessions.
#[async_trait]
pub trait AdminSessions {
    /// Check credentials and issue a session.
    ///
    /// Returns `Ok(None)` for an unknown e-mail or a wrong password; the two
    /// cases are deliberately indistinguishable to callers.
    async fn sign_in(&self, email: &Email, password: &str)
    -> Result<Option<AdminGrant>, BackendError>;

    /// Look up the identity behind a token. Expired or revoked tokens yield
    /// `Ok(None)`.
    async fn current_admin(
        &self,
        token: &SessionToken,
    ) -> Result<Option<AdminIdentity>, BackendError>;

    /// Destroy a session. Revoking an unknown token is not an error.
    async fn sign_out(&self, token: &SessionToken) -> Result<(), BackendError>;
}

/// Donation records as seen by the admin panel.
#[async_trait]
pub trait DonationStore {
    /// All donations, newest first, each with its status history.
    async fn list_donations(&self) -> Result<Vec<Donation>, BackendError>;

    async fn get_donation(&self, id: DonationId) -> Result<Donation, BackendError>;

    /// Move a donation to `status` and append the change to its history.
    async fn set_donation_status(
        &self,
        id: DonationId,
        status: DonationStatus,
        note: Option<String>,
        changed_by: Option<AdminUserId>,
    ) -> Result<Donation, BackendError>;

    async fn update_donation(
        &self,
        id: DonationId,
        edit: DonationEdit,
    ) -> Result<Donation, BackendError>;

    async fn delete_donation(&self, id: DonationId) -> Result<(), BackendError>;
}

/// Pledges submitted from the public site.
#[async_trait]
pub trait DonationIntake {
    /// Record a new donation in the `pending` state.
    async fn create_donation(&self, donation: NewDonation) -> Result<Donation, BackendError>;
}

/// Project management for the admin panel.
#[async_trait]
pub trait ProjectStore {
    /// All projects, published or not, newest first.
    async fn list_projects(&self) -> Result<Vec<Project>, BackendError>;

    async fn create_project(&self, draft: ProjectDraft) -> Result<Project, BackendError>;

    async fn update_project(
        &self,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, BackendError>;

    async fn delete_project(&self, id: ProjectId) -> Result<(), BackendError>;
}

/// Read-only project listing for the public site.
#[async_trait]
pub trait ProjectCatalog {
    /// Published projects, newest first.
    async fn published_projects(&self) -> Result<Vec<Project>, BackendError>;

    /// A published project by slug.
    async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, BackendError>;
}

/// Newsletter subscribers.
#[async_trait]
pub trait SubscriberStore {
    async fn subscribe(&self, email: &Email, locale: Locale)
    -> Result<Subscription, BackendError>;
}

/// Liveness of the backend connection, for readiness probes.
#[async_trait]
pub trait HealthCheck {
    async fn ping(&self) -> Result<(), BackendError>;
}

/// Everything the admin panel needs from a backend.
pub trait AdminBackend:
    AdminSessions + DonationStore + ProjectStore + HealthCheck + Send + Sync
{
}

impl<T> AdminBackend for T where
    T: AdminSessions + DonationStore + ProjectStore + HealthCheck + Send + Sync
{
}

/// Everything the public site needs from a backend.
pub trait SiteBackend:
    ProjectCatalog + DonationIntake + SubscriberStore + HealthCheck + Send + Sync
{
}

impl<T> SiteBackend for T where
    T: ProjectCatalog + DonationIntake + SubscriberStore + HealthCheck + Send + Sync
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_debug_is_redacted() {
        let token = SessionToken::new("deadbeef".to_owned());
        assert_eq!(format!("{token:?}"), "SessionToken(***)");
        assert_eq!(token.as_str(), "deadbeef");
    }

    #[test]
    fn test_client_errors() {
        assert!(BackendError::NotFound("donation 1".to_owned()).is_client_error());
        assert!(BackendError::Conflict("slug".to_owned()).is_client_error());
        assert!(!BackendError::Unavailable("timeout".to_owned()).is_client_error());
    }
}
