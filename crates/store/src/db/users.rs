//! User repository for database operations.
//!
//! The repository borrows a [`Session`] and runs every query on its
//! connection, so all reads and writes of one operation share a transaction.
//! Rows come back in the store's default order (`id` ascending, i.e.
//! insertion order).

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqliteConnection;
use tracing::instrument;

use userctl_core::{NewUser, Page, User, UserId};

use super::{RepositoryError, Session};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `users` queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            password: SecretString::from(row.password),
        }
    }
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
fn map_unique_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> UserRepository<'a> {
    /// Create a repository bound to `session`.
    #[must_use]
    pub fn new(session: &'a mut Session) -> Self {
        Self {
            conn: session.connection(),
        }
    }

    /// Get a user by exact username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, password
            FROM users
            WHERE username = ?1
            ",
        )
        .bind(username)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List every user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&mut self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, password
            FROM users
            ORDER BY id ASC
            ",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List one page of users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_page(&mut self, page: Page) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, password
            FROM users
            ORDER BY id ASC
            LIMIT ?1 OFFSET ?2
            ",
        )
        .bind(i64::from(page.limit()))
        .bind(i64::from(page.offset()))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Find users whose username or email contains `query`.
    ///
    /// Matching is case-sensitive and `%`/`_` have no special meaning.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn search(&mut self, query: &str) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, password
            FROM users
            WHERE instr(username, ?1) > 0 OR instr(email, ?1) > 0
            ORDER BY id ASC
            ",
        )
        .bind(query)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create(&mut self, user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, email, password)
            VALUES (?1, ?2, ?3)
            RETURNING id, username, email, password
            ",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.password.expose_secret())
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| map_unique_violation(e, "username or email already exists"))?;

        Ok(row.into())
    }

    /// Change the email of the user with `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if another user already has `email`.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn update_email(
        &mut self,
        id: UserId,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE users
            SET email = ?2
            WHERE id = ?1
            RETURNING id, username, email, password
            ",
        )
        .bind(id)
        .bind(email)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| map_unique_violation(e, "email already exists"))?;

        Ok(row.map(Into::into))
    }

    /// Delete the user with `id`.
    ///
    /// Returns `true` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
