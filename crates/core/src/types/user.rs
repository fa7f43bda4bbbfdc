//! User entity types.
//!
//! `username` and `email` are each unique across the store. The password is
//! persisted exactly as given (no hashing) and is therefore kept behind a
//! [`SecretString`]: it never appears in `Display`, `Debug` or serialized
//! output.

use core::fmt;

use secrecy::SecretString;
use serde::Serialize;

use super::id::UserId;

/// A stored user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Store-assigned surrogate key. Immutable after insert.
    pub id: UserId,
    /// Unique login name. Immutable after insert.
    pub username: String,
    /// Unique email address. No format validation is applied.
    pub email: String,
    /// Password as supplied at creation.
    #[serde(skip)]
    pub password: SecretString,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={} username='{}' email='{}'",
            self.id, self.username, self.email
        )
    }
}

/// A user that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Password, stored as given.
    pub password: SecretString,
}

impl NewUser {
    /// Create a new user from its three required fields.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}
