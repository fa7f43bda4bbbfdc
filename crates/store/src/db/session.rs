//! Scoped store sessions.
//!
//! A [`Session`] owns one pooled connection with an open transaction.
//! Consuming it with [`Session::commit`] persists staged writes; consuming it
//! with [`Session::rollback`] or [`Session::release`], or dropping it, discards
//! them. In every case the connection goes back to the pool exactly once.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::debug;

/// A scoped handle to the store with explicit commit/rollback control.
pub struct Session {
    tx: Transaction<'static, Sqlite>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    pub(crate) async fn begin(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        debug!("Session opened");
        Ok(Self { tx })
    }

    /// The underlying connection, for use as a query executor.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// Persist every write staged in this session.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the commit fails; nothing is persisted then.
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await?;
        debug!("Session committed");
        Ok(())
    }

    /// Discard every write staged in this session.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the rollback statement fails.
    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await?;
        debug!("Session rolled back");
        Ok(())
    }

    /// End a session that staged no writes.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if closing the transaction fails.
    pub async fn release(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await?;
        debug!("Session released");
        Ok(())
    }
}
