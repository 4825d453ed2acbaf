//! Newsletter subscribers.

use sqlx::PgPool;

use winter_gifts_core::backend::Subscription;
use winter_gifts_core::{Email, Locale};

use super::RepositoryError;

/// Repository for newsletter subscribers.
pub struct SubscriberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriberRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a subscriber. An existing address keeps its original locale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn subscribe(
        &self,
        email: &Email,
        locale: Locale,
    ) -> Result<Subscription, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO app.subscriber (email, locale)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            ",
        )
        .bind(email)
        .bind(locale.code())
        .execute(self.pool)
        .await?;

        Ok(if result.rows_affected() == 0 {
            Subscription::AlreadySubscribed
        } else {
            Subscription::Created
        })
    }
}
