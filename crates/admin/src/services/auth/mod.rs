//! Admin authentication service.
//!
//! Password login backed by Argon2id hashes. A successful login issues an
//! opaque random token that is stored in `admin.admin_session` with an expiry
//! and carried in the admin's `tower-sessions` record.

mod error;

pub use error::AdminAuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use rand::RngCore;
use sqlx::PgPool;

use winter_gifts_core::AdminRole;
use winter_gifts_core::Email;
use winter_gifts_core::backend::{AdminGrant, AdminIdentity, SessionToken};

use crate::db::RepositoryError;
use crate::db::admin_sessions::AdminSessionRepository;
use crate::db::admin_users::AdminUserRepository;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Random bytes per session token (hex-encoded to 64 characters).
const SESSION_TOKEN_BYTES: usize = 32;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    users: AdminUserRepository<'a>,
    sessions: AdminSessionRepository<'a>,
    session_ttl: chrono::Duration,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, session_ttl: chrono::Duration) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
            sessions: AdminSessionRepository::new(pool),
            session_ttl,
        }
    }

    /// Verify credentials and open a session.
    ///
    /// Returns `Ok(None)` for an unknown email or a wrong password.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Repository` if the database fails.
    pub async fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<AdminGrant>, AdminAuthError> {
        let Some(record) = self.users.get_by_email(email).await? else {
            // Hash anyway so unknown emails cost the same as wrong passwords
            let _ = hash_password(password);
            return Ok(None);
        };

        if verify_password(password, &record.password_hash).is_err() {
            tracing::info!(admin_id = %record.identity.id, "Admin login rejected");
            return Ok(None);
        }

        let token = generate_session_token();
        let expires_at = Utc::now() + self.session_ttl;
        self.sessions
            .create(&token, record.identity.id, expires_at)
            .await?;

        match self.sessions.delete_expired().await {
            Ok(0) => {}
            Ok(purged) => tracing::debug!(purged, "Expired admin sessions removed"),
            Err(e) => tracing::warn!(error = %e, "Failed to purge expired admin sessions"),
        }

        Ok(Some(AdminGrant {
            token,
            identity: record.identity,
            expires_at,
        }))
    }

    /// Resolve a token to its admin, ignoring expired sessions.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Repository` if the database fails.
    pub async fn current_admin(
        &self,
        token: &SessionToken,
    ) -> Result<Option<AdminIdentity>, AdminAuthError> {
        Ok(self.sessions.find_active(token).await?)
    }

    /// Revoke a session token.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Repository` if the database fails.
    pub async fn sign_out(&self, token: &SessionToken) -> Result<(), AdminAuthError> {
        self.sessions.delete(token).await?;
        Ok(())
    }

    /// Create an admin user with a password.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::WeakPassword` if the password is too short and
    /// `AdminAuthError::UserAlreadyExists` if the email is taken.
    pub async fn create_admin(
        &self,
        email: &Email,
        name: &str,
        role: AdminRole,
        password: &str,
    ) -> Result<AdminIdentity, AdminAuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .create(email, name.trim(), role, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AdminAuthError::UserAlreadyExists,
                other => AdminAuthError::Repository(other),
            })
    }
}

/// Generate an opaque session token.
#[must_use]
pub fn generate_session_token() -> SessionToken {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    SessionToken::new(hex::encode(bytes))
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AdminAuthError::WeakPassword` for passwords shorter than
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &str) -> Result<(), AdminAuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminAuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AdminAuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminAuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AdminAuthError::PasswordHash` if the hash is malformed or the
/// password does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AdminAuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AdminAuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminAuthError::PasswordHash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.as_str().len(), 64);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_session_token());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("snowflake-42").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("snowflake-42", &hash).is_ok());
        assert!(verify_password("snowflake-43", &hash).is_err());
        assert!(verify_password("snowflake-42", "not a hash").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("exactly8").is_ok());
    }
}
