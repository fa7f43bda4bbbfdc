//! Schema manager for the `users` table.

use sqlx::SqliteConnection;
use tracing::{info, instrument, warn};

const DROP_USERS_TABLE: &str = "DROP TABLE IF EXISTS users";

const CREATE_USERS_TABLE: &str = r"
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
";

/// Drop the `users` table (and every row in it), then recreate it empty.
///
/// This is destructive and irreversible once the surrounding session commits.
///
/// # Errors
///
/// Returns `sqlx::Error` if either statement fails.
#[instrument(skip(conn))]
pub async fn reset(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    warn!("Dropping users table; all existing users will be deleted");
    sqlx::query(DROP_USERS_TABLE).execute(&mut *conn).await?;
    sqlx::query(CREATE_USERS_TABLE).execute(&mut *conn).await?;
    info!("Users table recreated");
    Ok(())
}
