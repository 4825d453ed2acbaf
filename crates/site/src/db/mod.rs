//! Database operations for the public site.
//!
//! ## Tables
//!
//! - `app.project` - Fundraising projects (read-only here)
//! - `app.donation`, `app.donation_status_change` - Pledges from the site
//! - `app.subscriber` - Newsletter subscribers
//!
//! # Migrations
//!
//! Migrations are stored in `migrations/` at the workspace root and run via:
//! ```bash
//! cargo run -p winter-gifts-cli -- migrate
//! ```

pub mod backend;
pub mod donations;
pub mod projects;
pub mod subscribers;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use winter_gifts_core::BackendError;

pub use backend::PgBackend;
pub use donations::DonationRepository;
pub use projects::ProjectRepository;
pub use subscribers::SubscriberRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<RepositoryError> for BackendError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DataCorruption(msg) => Self::Unavailable(msg),
            RepositoryError::Database(e) => Self::Unavailable(e.to_string()),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
