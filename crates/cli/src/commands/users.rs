//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! userctl create-user alice alice@example.com s3cret
//! userctl get-user alice
//! userctl change-email alice alice@example.org
//! userctl delete-user alice
//! userctl search-users example
//! userctl list-users 10 0
//! ```

use userctl_core::Page;
use userctl_store::Store;
use userctl_store::services::users;

use super::{CommandError, OutputFormat, render};

/// Retrieve a user by exact username.
///
/// # Errors
///
/// Returns an error if the store operation fails.
pub async fn get(
    store: &Store,
    username: &str,
    format: OutputFormat,
) -> Result<String, CommandError> {
    render(&users::get_user(store, username).await?, format)
}

/// List every user.
///
/// # Errors
///
/// Returns an error if the store operation fails.
pub async fn get_all(store: &Store, format: OutputFormat) -> Result<String, CommandError> {
    render(&users::get_all_users(store).await?, format)
}

/// Update a user's email.
///
/// # Errors
///
/// Returns an error if the store operation fails.
pub async fn change_email(
    store: &Store,
    username: &str,
    new_email: &str,
    format: OutputFormat,
) -> Result<String, CommandError> {
    render(&users::change_email(store, username, new_email).await?, format)
}

/// Create a user.
///
/// # Errors
///
/// Returns an error if the store operation fails for a reason other than a
/// taken username or email.
pub async fn create(
    store: &Store,
    username: &str,
    email: &str,
    password: &str,
    format: OutputFormat,
) -> Result<String, CommandError> {
    render(
        &users::create_user(store, username, email, password).await?,
        format,
    )
}

/// Delete a user by username.
///
/// # Errors
///
/// Returns an error if the store operation fails.
pub async fn delete(
    store: &Store,
    username: &str,
    format: OutputFormat,
) -> Result<String, CommandError> {
    render(&users::delete_user(store, username).await?, format)
}

/// Search usernames and emails for a substring.
///
/// # Errors
///
/// Returns an error if the store operation fails.
pub async fn search(
    store: &Store,
    query: &str,
    format: OutputFormat,
) -> Result<String, CommandError> {
    render(&users::search_users(store, query).await?, format)
}

/// List one page of users.
///
/// # Errors
///
/// Returns an error if the store operation fails.
pub async fn list(store: &Store, page: Page, format: OutputFormat) -> Result<String, CommandError> {
    render(&users::list_users(store, page).await?, format)
}
