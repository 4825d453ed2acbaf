//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_SESSION_TTL_HOURS` - Backend session lifetime, 1 to 720 (default: 12)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)
//!
//! Blank values count as unset.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

use crate::telemetry::SentrySettings;

const DEFAULT_SESSION_TTL_HOURS: i64 = 12;
const MAX_SESSION_TTL_HOURS: i64 = 24 * 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Connection URL; contains the database password.
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL, also decides whether cookies are `Secure`.
    pub base_url: String,
    /// How long a backend admin session stays valid after login
    pub session_ttl_hours: i64,
    pub sentry: SentrySettings,
}

impl AdminConfig {
    /// Load configuration from the process environment, after merging a
    /// `.env` file if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let session_ttl_hours = vars.parse("ADMIN_SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_SESSION_TTL_HOURS".to_string(),
                format!("must be between 1 and {MAX_SESSION_TTL_HOURS} hours (got {session_ttl_hours})"),
            ));
        }

        Ok(Self {
            database_url: vars.database_url("ADMIN_DATABASE_URL")?,
            host: vars.parse("ADMIN_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: vars.parse("ADMIN_PORT", 3001)?,
            base_url: vars.required("ADMIN_BASE_URL")?,
            session_ttl_hours,
            sentry: SentrySettings {
                dsn: vars.optional("SENTRY_DSN"),
                environment: vars.optional("SENTRY_ENVIRONMENT"),
                sample_rate: vars.parse("SENTRY_SAMPLE_RATE", 1.0)?,
                traces_sample_rate: vars.parse("SENTRY_TRACES_SAMPLE_RATE", 1.0)?,
            },
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Backend session lifetime.
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn parse<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// `DATABASE_URL` is what `fly postgres attach` sets.
    fn database_url(&self, key: &str) -> Result<SecretString, ConfigError> {
        self.optional(key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AdminConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AdminConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const MINIMAL: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/wg"),
        ("ADMIN_BASE_URL", "http://localhost:3001"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&MINIMAL).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.session_ttl(), chrono::Duration::hours(12));
        assert_eq!(config.database_url.expose_secret(), "postgres://localhost/wg");
        assert!(config.sentry.dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_admin_database_url_wins() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("ADMIN_DATABASE_URL", "postgres://admin@localhost/wg"));
        let config = load(&pairs).unwrap();
        assert_eq!(
            config.database_url.expose_secret(),
            "postgres://admin@localhost/wg"
        );
    }

    #[test]
    fn test_missing_base_url() {
        let err = load(&[("DATABASE_URL", "postgres://localhost/wg"), ("ADMIN_BASE_URL", "  ")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "ADMIN_BASE_URL"));
    }

    #[test]
    fn test_session_ttl_bounds() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("ADMIN_SESSION_TTL_HOURS", " 48 "));
        assert_eq!(load(&pairs).unwrap().session_ttl_hours, 48);

        for bad in ["0", "721", "forever"] {
            let mut pairs = MINIMAL.to_vec();
            pairs.push(("ADMIN_SESSION_TTL_HOURS", bad));
            assert!(
                matches!(load(&pairs), Err(ConfigError::InvalidEnvVar(key, _)) if key == "ADMIN_SESSION_TTL_HOURS"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/wg"),
            ("ADMIN_BASE_URL", "https://admin.example.org"),
            ("ADMIN_PORT", "8080"),
        ])
        .unwrap();
        assert!(config.is_secure());
        assert_eq!(config.port, 8080);
    }
}
