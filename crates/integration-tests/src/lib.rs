//! Integration tests for userctl.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p userctl-integration-tests
//! ```
//!
//! Every test gets its own [`TestStore`]: a fresh `SQLite` file in a
//! temporary directory, removed when the store is dropped. No external
//! services are needed.

use tempfile::TempDir;

use userctl_store::services::users;
use userctl_store::{Store, StoreConfig};

/// A store backed by a throwaway database file.
pub struct TestStore {
    pub store: Store,
    url: String,
    _dir: TempDir,
}

async fn connect(url: &str) -> Store {
    let config = StoreConfig::from_lookup(|_| None)
        .expect("Default config is valid")
        .with_database_url(url);
    Store::connect(&config)
        .await
        .expect("Failed to connect to test database")
}

impl TestStore {
    /// Connect to an empty database with no tables.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the connection cannot be created.
    pub async fn empty() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("users.db").display());
        let store = connect(&url).await;
        Self {
            store,
            url,
            _dir: dir,
        }
    }

    /// Open a second, independent pool on the same database file, as another
    /// process would.
    ///
    /// # Panics
    ///
    /// Panics if the connection cannot be established.
    pub async fn connect_again(&self) -> Store {
        connect(&self.url).await
    }

    /// Open an independent pool on the same file that may not write to it.
    ///
    /// # Panics
    ///
    /// Panics if the connection cannot be established.
    pub async fn connect_read_only(&self) -> Store {
        connect(&format!("{}?mode=ro", self.url)).await
    }

    /// Connect and run `initialize`, leaving only the seed user.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be created or initialized.
    pub async fn initialized() -> Self {
        let test = Self::empty().await;
        users::initialize_schema(&test.store)
            .await
            .expect("Failed to initialize schema");
        test
    }

    /// Connect, initialize, then remove the seed user.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be prepared.
    pub async fn without_users() -> Self {
        let test = Self::initialized().await;
        users::delete_user(&test.store, users::SEED_USERNAME)
            .await
            .expect("Failed to delete seed user");
        test
    }
}
