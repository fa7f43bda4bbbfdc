//! User operations.
//!
//! Each operation acquires one [`Session`](crate::Session), runs against it
//! through a [`UserRepository`], and ends it: writes are committed only once
//! every statement has succeeded, failures are rolled back before the error
//! is returned, and read-only sessions are released. The result is a typed
//! outcome whose `Display` is the human-readable message and whose `Serialize`
//! form is tagged with a `status`.

use core::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{error, info, instrument, warn};

use userctl_core::{NewUser, Page, User};

use crate::db::{RepositoryError, Session, Store, UserRepository, schema};

/// Username of the user inserted by [`initialize_schema`].
pub const SEED_USERNAME: &str = "bob";
/// Email of the user inserted by [`initialize_schema`].
pub const SEED_EMAIL: &str = "bob@mail.com";
/// Password of the user inserted by [`initialize_schema`].
pub const SEED_PASSWORD: &str = "bobpass";

// =============================================================================
// Outcomes
// =============================================================================

/// Result of [`initialize_schema`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename = "initialized")]
pub struct Initialized {
    /// The seed user inserted into the fresh table.
    pub seed: User,
}

impl fmt::Display for Initialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Database Initialized")
    }
}

/// Result of [`get_user`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Found(User),
    NotFound { username: String },
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(user) => write!(f, "{user}"),
            Self::NotFound { username } => write!(f, "{username} not found!"),
        }
    }
}

/// Result of [`create_user`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreateOutcome {
    Created(User),
    /// The username or email is already taken; nothing was written.
    Conflict,
}

impl fmt::Display for CreateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(user) => write!(f, "{user}"),
            Self::Conflict => f.write_str("Username or email already taken!"),
        }
    }
}

/// Result of [`change_email`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChangeEmailOutcome {
    Updated(User),
    NotFound { username: String },
    /// Another user already has the requested email; nothing was written.
    EmailTaken { email: String },
}

impl fmt::Display for ChangeEmailOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated(user) => {
                write!(f, "Updated {}'s email to {}", user.username, user.email)
            }
            Self::NotFound { username } => {
                write!(f, "{username} not found! Unable to update email.")
            }
            Self::EmailTaken { email } => write!(f, "Email {email} already taken!"),
        }
    }
}

/// Result of [`delete_user`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted { username: String },
    NotFound { username: String },
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted { username } => write!(f, "{username} deleted"),
            Self::NotFound { username } => {
                write!(f, "{username} not found! Unable to delete user.")
            }
        }
    }
}

/// Which query produced a [`UserListing`]. Selects the empty-result message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingScope {
    All,
    Search { query: String },
    Page { limit: u32, offset: u32 },
}

/// Result of [`get_all_users`], [`search_users`] and [`list_users`].
///
/// Serializes with a `status` of `found` or `empty` next to the scope and
/// the matched users.
#[derive(Debug, Clone)]
pub struct UserListing {
    pub scope: ListingScope,
    pub users: Vec<User>,
}

impl UserListing {
    /// Whether the query matched no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Serialize for UserListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let status = if self.is_empty() { "empty" } else { "found" };
        let mut state = serializer.serialize_struct("UserListing", 3)?;
        state.serialize_field("status", status)?;
        state.serialize_field("scope", &self.scope)?;
        state.serialize_field("users", &self.users)?;
        state.end()
    }
}

impl fmt::Display for UserListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.users.is_empty() {
            return match &self.scope {
                ListingScope::All => f.write_str("No users found"),
                ListingScope::Search { query } => {
                    write!(f, "No users found matching '{query}'")
                }
                ListingScope::Page { .. } => f.write_str("No users found."),
            };
        }

        for (i, user) in self.users.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{user}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Stage-then-commit helper: commits on success, rolls back on error.
///
/// A failed rollback is logged; the statement error is what the caller sees.
async fn finish<T>(
    session: Session,
    result: Result<T, RepositoryError>,
) -> Result<T, RepositoryError> {
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = session.rollback().await {
                error!(error = %e, %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

async fn reset_and_seed(session: &mut Session) -> Result<User, RepositoryError> {
    schema::reset(session.connection()).await?;
    let seed = NewUser::new(SEED_USERNAME, SEED_EMAIL, SEED_PASSWORD);
    UserRepository::new(session).create(&seed).await
}

async fn stage_email_change(
    session: &mut Session,
    username: &str,
    new_email: &str,
) -> Result<Option<User>, RepositoryError> {
    let mut repo = UserRepository::new(session);
    let Some(user) = repo.get_by_username(username).await? else {
        return Ok(None);
    };
    repo.update_email(user.id, new_email).await
}

async fn stage_delete(session: &mut Session, username: &str) -> Result<bool, RepositoryError> {
    let mut repo = UserRepository::new(session);
    match repo.get_by_username(username).await? {
        Some(user) => repo.delete(user.id).await,
        None => Ok(false),
    }
}

/// Drop and recreate the user table, then insert the seed user.
///
/// **Destructive**: every existing user is deleted. There is no confirmation.
///
/// # Errors
///
/// Returns `RepositoryError` if any statement or the commit fails; the
/// previous data is then left intact.
#[instrument(skip(store))]
pub async fn initialize_schema(store: &Store) -> Result<Initialized, RepositoryError> {
    let mut session = store.session().await?;
    let result = reset_and_seed(&mut session).await;
    let seed = finish(session, result).await?;
    info!(id = %seed.id, "Database initialized");
    Ok(Initialized { seed })
}

/// Look up a user by exact username.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
#[instrument(skip(store))]
pub async fn get_user(store: &Store, username: &str) -> Result<LookupOutcome, RepositoryError> {
    let mut session = store.session().await?;
    let user = UserRepository::new(&mut session)
        .get_by_username(username)
        .await?;
    session.release().await?;

    Ok(match user {
        Some(user) => LookupOutcome::Found(user),
        None => LookupOutcome::NotFound {
            username: username.to_owned(),
        },
    })
}

/// Fetch every user.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
#[instrument(skip(store))]
pub async fn get_all_users(store: &Store) -> Result<UserListing, RepositoryError> {
    let mut session = store.session().await?;
    let users = UserRepository::new(&mut session).list_all().await?;
    session.release().await?;

    Ok(UserListing {
        scope: ListingScope::All,
        users,
    })
}

/// Change the email of the user named `username`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query or the commit fails.
#[instrument(skip(store))]
pub async fn change_email(
    store: &Store,
    username: &str,
    new_email: &str,
) -> Result<ChangeEmailOutcome, RepositoryError> {
    let mut session = store.session().await?;
    let result = stage_email_change(&mut session, username, new_email).await;

    match finish(session, result).await {
        Ok(Some(user)) => {
            info!(id = %user.id, "Email updated");
            Ok(ChangeEmailOutcome::Updated(user))
        }
        Ok(None) => Ok(ChangeEmailOutcome::NotFound {
            username: username.to_owned(),
        }),
        Err(RepositoryError::Conflict(reason)) => {
            info!(%reason, "Email change rejected");
            Ok(ChangeEmailOutcome::EmailTaken {
                email: new_email.to_owned(),
            })
        }
        Err(e) => Err(e),
    }
}

/// Create a new user.
///
/// A uniqueness conflict on username or email is rolled back and reported as
/// [`CreateOutcome::Conflict`], leaving the store unchanged.
///
/// The password is stored exactly as given, without hashing.
///
/// # Errors
///
/// Returns `RepositoryError::Database` for failures other than a conflict.
#[instrument(skip(store, password))]
pub async fn create_user(
    store: &Store,
    username: &str,
    email: &str,
    password: &str,
) -> Result<CreateOutcome, RepositoryError> {
    warn!("Passwords are stored unhashed");
    let new_user = NewUser::new(username, email, password);

    let mut session = store.session().await?;
    let result = UserRepository::new(&mut session).create(&new_user).await;

    match finish(session, result).await {
        Ok(user) => {
            info!(id = %user.id, "User created");
            Ok(CreateOutcome::Created(user))
        }
        Err(RepositoryError::Conflict(reason)) => {
            info!(%reason, "User creation rejected");
            Ok(CreateOutcome::Conflict)
        }
        Err(e) => Err(e),
    }
}

/// Delete the user named `username`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query or the commit fails.
#[instrument(skip(store))]
pub async fn delete_user(store: &Store, username: &str) -> Result<DeleteOutcome, RepositoryError> {
    let mut session = store.session().await?;
    let result = stage_delete(&mut session, username).await;

    let deleted = finish(session, result).await?;
    let username = username.to_owned();
    Ok(if deleted {
        info!(%username, "User deleted");
        DeleteOutcome::Deleted { username }
    } else {
        DeleteOutcome::NotFound { username }
    })
}

/// Find users whose username or email contains `query` (case-sensitive).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
#[instrument(skip(store))]
pub async fn search_users(store: &Store, query: &str) -> Result<UserListing, RepositoryError> {
    let mut session = store.session().await?;
    let users = UserRepository::new(&mut session).search(query).await?;
    session.release().await?;

    Ok(UserListing {
        scope: ListingScope::Search {
            query: query.to_owned(),
        },
        users,
    })
}

/// Fetch one page of users in insertion order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
#[instrument(skip(store))]
pub async fn list_users(store: &Store, page: Page) -> Result<UserListing, RepositoryError> {
    let mut session = store.session().await?;
    let users = UserRepository::new(&mut session).list_page(page).await?;
    session.release().await?;

    Ok(UserListing {
        scope: ListingScope::Page {
            limit: page.limit(),
            offset: page.offset(),
        },
        users,
    })
}
