//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SITE_BASE_URL` - Public URL for the site
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_CONTENT_DIR` - Directory holding `children.json` (default: crates/site/content)
//! - `SITE_DEFAULT_LOCALE` - Fallback locale code, one of en/zh/ua (default: en)
//! - `SITE_PROJECT_CACHE_SECS` - Published project cache TTL (default: 60)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use winter_gifts_core::LocaleConfig;

use crate::telemetry::SentrySettings;

/// Default location of the static content files.
pub const DEFAULT_CONTENT_DIR: &str = "crates/site/content";

const DEFAULT_PROJECT_CACHE_SECS: u64 = 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Connection URL; contains the database password.
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    /// Directory holding static content such as `children.json`
    pub content_dir: PathBuf,
    /// Supported locales and the fallback
    pub locales: LocaleConfig,
    /// How long published projects stay cached
    pub project_cache_ttl: Duration,
    pub sentry: SentrySettings,
}

impl SiteConfig {
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

    /// Load configuration through an arbitrary variable lookup. Blank values
    /// count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let default_locale = vars.optional("SITE_DEFAULT_LOCALE");
        let locales = LocaleConfig::standard_with_default(default_locale.as_deref().unwrap_or("en"))
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_DEFAULT_LOCALE".to_string(), e.to_string()))?;

        Ok(Self {
            database_url: vars.database_url("SITE_DATABASE_URL")?,
            host: vars.parse("SITE_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: vars.parse("SITE_PORT", 3000)?,
            base_url: vars.required("SITE_BASE_URL")?,
            content_dir: vars.parse("SITE_CONTENT_DIR", PathBuf::from(DEFAULT_CONTENT_DIR))?,
            locales,
            project_cache_ttl: Duration::from_secs(
                vars.parse("SITE_PROJECT_CACHE_SECS", DEFAULT_PROJECT_CACHE_SECS)?,
            ),
            sentry: SentrySettings {
                dsn: vars.optional("SENTRY_DSN"),
                environment: vars.optional("SENTRY_ENVIRONMENT"),
                sample_rate: vars.parse("SENTRY_SAMPLE_RATE", 1.0)?,
                traces_sample_rate: vars.parse("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
            },
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Path of the children/gift content file.
    #[must_use]
    pub fn children_file(&self) -> PathBuf {
        self.content_dir.join("children.json")
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
