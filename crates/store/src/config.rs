//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DATABASE_URL` - `SQLite` connection string (default: `sqlite://users.db`)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 1)
//! - `DATABASE_ACQUIRE_TIMEOUT_SECS` - Seconds to wait for a connection (default: 10)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://users.db";
const DEFAULT_MAX_CONNECTIONS: &str = "1";
const DEFAULT_ACQUIRE_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store configuration.
///
/// Built once at startup and passed explicitly to [`crate::Store::connect`].
/// Implements `Debug` manually to redact the connection string.
#[derive(Clone)]
pub struct StoreConfig {
    /// `SQLite` connection URL (may embed credentials for other drivers)
    pub database_url: SecretString,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// How long to wait for a pooled connection
    pub acquire_timeout: Duration,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let database_url =
            SecretString::from(get_or_default("DATABASE_URL", DEFAULT_DATABASE_URL));
        let max_connections = get_or_default("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DATABASE_MAX_CONNECTIONS".to_owned(), e.to_string())
            })?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DATABASE_MAX_CONNECTIONS".to_owned(),
                "must be at least 1".to_owned(),
            ));
        }
        let acquire_timeout_secs =
            get_or_default("DATABASE_ACQUIRE_TIMEOUT_SECS", DEFAULT_ACQUIRE_TIMEOUT_SECS)
                .parse::<u64>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "DATABASE_ACQUIRE_TIMEOUT_SECS".to_owned(),
                        e.to_string(),
                    )
                })?;

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }

    /// Replace the connection string, e.g. from a command-line flag.
    #[must_use]
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = SecretString::from(database_url.into());
        self
    }
}
