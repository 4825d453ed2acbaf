//! Backend admin session tokens.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use winter_gifts_core::AdminUserId;
use winter_gifts_core::backend::{AdminIdentity, SessionToken};

use super::RepositoryError;
use super::admin_users::AdminUserRow;

/// Repository for `admin.admin_session`.
pub struct AdminSessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminSessionRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a newly issued token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        token: &SessionToken,
        admin_user_id: AdminUserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO admin.admin_session (token, admin_user_id, expires_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(token.as_str())
        .bind(admin_user_id)
        .bind(expires_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// The admin owning an unexpired token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_active(
        &self,
        token: &SessionToken,
    ) -> Result<Option<AdminIdentity>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT u.id, u.email, u.name, u.role
            FROM admin.admin_session s
            JOIN admin.admin_user u ON u.id = s.admin_user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            ",
        )
        .bind(token.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Remove a token. Unknown tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, token: &SessionToken) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM admin.admin_session WHERE token = $1")
            .bind(token.as_str())
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Purge expired tokens, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM admin.admin_session WHERE expires_at <= NOW()")
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
