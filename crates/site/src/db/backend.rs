//! `PostgreSQL` implementation of the site backend traits.

use async_trait::async_trait;
use sqlx::PgPool;

use winter_gifts_core::backend::{
    DonationIntake, HealthCheck, ProjectCatalog, SubscriberStore, Subscription,
};
use winter_gifts_core::{BackendError, Donation, Email, Locale, NewDonation, Project};

use super::{DonationRepository, ProjectRepository, SubscriberRepository};

/// Site backend over a shared connection pool.
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectCatalog for PgBackend {
    async fn published_projects(&self) -> Result<Vec<Project>, BackendError> {
        Ok(ProjectRepository::new(&self.pool).list_published().await?)
    }

    async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, BackendError> {
        Ok(ProjectRepository::new(&self.pool).find_published(slug).await?)
    }
}

#[async_trait]
impl DonationIntake for PgBackend {
    async fn create_donation(&self, donation: NewDonation) -> Result<Donation, BackendError> {
        Ok(DonationRepository::new(&self.pool).create(donation).await?)
    }
}

#[async_trait]
impl SubscriberStore for PgBackend {
    async fn subscribe(
        &self,
        email: &Email,
        locale: Locale,
    ) -> Result<Subscription, BackendError> {
        Ok(SubscriberRepository::new(&self.pool)
            .subscribe(email, locale)
            .await?)
    }
}

#[async_trait]
impl HealthCheck for PgBackend {
    async fn ping(&self) -> Result<(), BackendError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }
}
