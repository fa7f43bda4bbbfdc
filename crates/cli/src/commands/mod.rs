//! Command handlers.
//!
//! Each handler runs one store operation and renders its outcome.
//!
//! - `schema` - `initialize` (destructive)
//! - `users` - user CRUD, search and pagination

pub mod schema;
pub mod users;

use core::fmt::Display;

use serde::Serialize;
use thiserror::Error;

use userctl_store::{ConfigError, RepositoryError};

/// Errors that abort a command. Modeled outcomes are never errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Store configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The store could not be reached.
    #[error("database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// A store operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The outcome could not be encoded as JSON.
    #[error("output error: {0}")]
    Render(#[from] serde_json::Error),
}

/// How outcomes are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable messages.
    Text,
    /// One JSON document.
    Json,
}

/// Render an outcome in the requested format.
///
/// # Errors
///
/// Returns `CommandError::Render` if JSON encoding fails.
pub fn render<T: Display + Serialize>(
    outcome: &T,
    format: OutputFormat,
) -> Result<String, CommandError> {
    match format {
        OutputFormat::Text => Ok(outcome.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
    }
}
