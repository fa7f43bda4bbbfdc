//! Schema commands.

use userctl_store::Store;
use userctl_store::services::users;

use super::{CommandError, OutputFormat, render};

/// Drop and recreate the user table, then insert the seed user.
///
/// **Destructive**: all existing users are lost.
///
/// # Errors
///
/// Returns an error if any store operation fails.
pub async fn initialize(store: &Store, format: OutputFormat) -> Result<String, CommandError> {
    let outcome = users::initialize_schema(store).await?;
    render(&outcome, format)
}
