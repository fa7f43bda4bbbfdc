//! Database operations for the user store.
//!
//! # Database: `SQLite`
//!
//! ## Tables
//!
//! - `users` - The user entity (`username` and `email` unique)
//!
//! # Schema
//!
//! There is no migrations framework. [`schema::reset`] drops and recreates
//! the table; it is only reachable through the destructive `initialize`
//! command.

pub mod schema;
pub mod session;
pub mod users;

use std::str::FromStr;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use crate::config::StoreConfig;

pub use session::Session;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., unique username or email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool from the store configuration.
///
/// The database file is created if it does not exist.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(config: &StoreConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(config.database_url.expose_secret())?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
}

/// Handle to the relational store.
///
/// Owns the connection pool; all access goes through [`Store::session`].
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Connect to the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection cannot be established.
    pub async fn connect(config: &StoreConfig) -> Result<Self, sqlx::Error> {
        tracing::debug!(?config, "Connecting to store");
        let pool = create_pool(config).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Acquire a scoped session (one connection, one open transaction).
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if no connection can be acquired or the
    /// transaction cannot be started.
    pub async fn session(&self) -> Result<Session, sqlx::Error> {
        Session::begin(&self.pool).await
    }

    /// Close the pool, waiting for every connection to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
