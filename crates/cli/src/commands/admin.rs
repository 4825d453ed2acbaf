//! `wg-cli admin create`: bootstrap staff accounts for the admin panel.
//!
//! ```bash
//! WG_ADMIN_PASSWORD=... wg-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//! ```
//!
//! Reads `ADMIN_DATABASE_URL` (or `DATABASE_URL`) and `WG_ADMIN_PASSWORD`,
//! which must be at least 8 characters.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

use winter_gifts_admin::services::{AdminAuthError, AdminAuthService};
use winter_gifts_core::{AdminRole, AdminUserId, Email, EmailError};

/// Unused by the CLI itself; the service needs a value to build.
const SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}; expected super_admin, admin or viewer")]
    InvalidRole(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Weak password, duplicate email and similar.
    #[error(transparent)]
    Auth(#[from] AdminAuthError),
}

fn env_secret(key: &'static str) -> Result<SecretString, AdminError> {
    std::env::var(key)
        .map(SecretString::from)
        .map_err(|_| AdminError::MissingEnvVar(key))
}

/// Create an admin account and return its id.
///
/// Arguments are validated before anything is read from the environment or
/// the database.
///
/// # Errors
///
/// Returns `AdminError` on invalid input, a missing password or database URL,
/// a rejected password or duplicate email, or an unreachable database.
pub async fn create_user(email: &str, name: &str, role: &str) -> Result<AdminUserId, AdminError> {
    let role: AdminRole = role.parse().map_err(AdminError::InvalidRole)?;
    let email = Email::parse(email)?;

    dotenvy::dotenv().ok();
    let password = env_secret("WG_ADMIN_PASSWORD")?;
    let database_url = env_secret("ADMIN_DATABASE_URL")
        .or_else(|_| env_secret("DATABASE_URL"))
        .map_err(|_| AdminError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    let pool = PgPool::connect(database_url.expose_secret()).await?;
    tracing::info!(%email, %role, "Creating admin user");

    let identity = AdminAuthService::new(&pool, chrono::Duration::hours(SESSION_TTL_HOURS))
        .create_admin(&email, name, role, password.expose_secret())
        .await?;

    tracing::info!(id = %identity.id, email = %identity.email, role = %identity.role, "Admin user created");
    Ok(identity.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_input_fails_before_connecting() {
        let err = create_user("not-an-email", "Elf", "admin").await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidEmail(EmailError::MissingAtSymbol)));

        let err = create_user("elf@example.org", "Elf", "owner").await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidRole(_)));
        assert!(err.to_string().contains("expected super_admin"));
    }
}
