//! `PostgreSQL` implementation of the admin backend traits.

use async_trait::async_trait;
use sqlx::PgPool;

use winter_gifts_core::backend::{
    AdminGrant, AdminIdentity, AdminSessions, DonationStore, HealthCheck, ProjectStore,
    SessionToken,
};
use winter_gifts_core::{
    AdminUserId, BackendError, Donation, DonationEdit, DonationId, DonationStatus, Email, Project,
    ProjectDraft, ProjectId,
};

use super::{DonationRepository, ProjectRepository};
use crate::services::{AdminAuthError, AdminAuthService};

/// Admin backend over a shared connection pool.
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
    session_ttl: chrono::Duration,
}

impl PgBackend {
    #[must_use]
    pub const fn new(pool: PgPool, session_ttl: chrono::Duration) -> Self {
        Self { pool, session_ttl }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn auth(&self) -> AdminAuthService<'_> {
        AdminAuthService::new(&self.pool, self.session_ttl)
    }
}

impl From<AdminAuthError> for BackendError {
    fn from(err: AdminAuthError) -> Self {
        match err {
            AdminAuthError::Repository(e) => e.into(),
            AdminAuthError::UserAlreadyExists => Self::Conflict(err.to_string()),
            AdminAuthError::InvalidEmail(_) | AdminAuthError::WeakPassword(_) => {
                Self::Invalid(err.to_string())
            }
            AdminAuthError::PasswordHash => Self::Unavailable(err.to_string()),
        }
    }
}

#[async_trait]
impl AdminSessions for PgBackend {
    async fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<AdminGrant>, BackendError> {
        Ok(self.auth().sign_in(email, password).await?)
    }

    async fn current_admin(
        &self,
        token: &SessionToken,
    ) -> Result<Option<AdminIdentity>, BackendError> {
        Ok(self.auth().current_admin(token).await?)
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), BackendError> {
        Ok(self.auth().sign_out(token).await?)
    }
}

#[async_trait]
impl DonationStore for PgBackend {
    async fn list_donations(&self) -> Result<Vec<Donation>, BackendError> {
        Ok(DonationRepository::new(&self.pool).list_all().await?)
    }

    async fn get_donation(&self, id: DonationId) -> Result<Donation, BackendError> {
        DonationRepository::new(&self.pool)
            .get(id)
            .await
            .map_err(|e| not_found_as(e, "donation"))
    }

    async fn set_donation_status(
        &self,
        id: DonationId,
        status: DonationStatus,
        note: Option<String>,
        changed_by: Option<AdminUserId>,
    ) -> Result<Donation, BackendError> {
        DonationRepository::new(&self.pool)
            .set_status(id, status, note.as_deref(), changed_by)
            .await
            .map_err(|e| not_found_as(e, "donation"))
    }

    async fn update_donation(
        &self,
        id: DonationId,
        edit: DonationEdit,
    ) -> Result<Donation, BackendError> {
        DonationRepository::new(&self.pool)
            .update(id, &edit)
            .await
            .map_err(|e| not_found_as(e, "donation"))
    }

    async fn delete_donation(&self, id: DonationId) -> Result<(), BackendError> {
        DonationRepository::new(&self.pool)
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, "donation"))
    }
}

#[async_trait]
impl ProjectStore for PgBackend {
    async fn list_projects(&self) -> Result<Vec<Project>, BackendError> {
        Ok(ProjectRepository::new(&self.pool).list_all().await?)
    }

    async fn create_project(&self, draft: ProjectDraft) -> Result<Project, BackendError> {
        Ok(ProjectRepository::new(&self.pool).create(&draft).await?)
    }

    async fn update_project(
        &self,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, BackendError> {
        ProjectRepository::new(&self.pool)
            .update(id, &draft)
            .await
            .map_err(|e| not_found_as(e, "project"))
    }

    async fn delete_project(&self, id: ProjectId) -> Result<(), BackendError> {
        ProjectRepository::new(&self.pool)
            .delete(id)
            .await
            .map_err(|e| not_found_as(e, "project"))
    }
}

#[async_trait]
impl HealthCheck for PgBackend {
    async fn ping(&self) -> Result<(), BackendError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

fn not_found_as(err: super::RepositoryError, what: &str) -> BackendError {
    match err {
        super::RepositoryError::NotFound => BackendError::NotFound(what.to_string()),
        other => other.into(),
    }
}
