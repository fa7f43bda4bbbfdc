//! userctl - Manage the user table of a `SQLite` store.
//!
//! # Usage
//!
//! ```bash
//! # Drop and recreate the table, seeding the user `bob` (DESTRUCTIVE)
//! userctl initialize
//!
//! # Create, read, update and delete
//! userctl create-user alice alice@example.com s3cret
//! userctl get-user alice
//! userctl change-email alice alice@example.org
//! userctl delete-user alice
//!
//! # Listings
//! userctl get-all-users
//! userctl search-users example
//! userctl list-users 10 20
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `SQLite` connection string (default: `sqlite://users.db`)
//! - `RUST_LOG` - Log filter for stderr diagnostics (default: `warn`)
//!
//! Every modeled outcome, including "not found" and "already taken", is
//! printed to stdout and exits with status 0. Any other failure is logged and
//! exits with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use userctl_core::Page;
use userctl_store::{Store, StoreConfig};

use commands::{CommandError, OutputFormat};

mod commands;

#[derive(Parser)]
#[command(name = "userctl")]
#[command(author, version, about = "Manage users in a SQLite store")]
struct Cli {
    /// Database connection string (overrides `DATABASE_URL`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop all tables, recreate them and insert the default user (DESTRUCTIVE)
    Initialize,
    /// Retrieve a user by their exact username
    GetUser {
        /// The username of the user to retrieve
        username: String,
    },
    /// Retrieve and list all users
    GetAllUsers,
    /// Update the email address of an existing user
    ChangeEmail {
        /// The username of the user to update
        username: String,
        /// The new email address to assign to the user
        new_email: String,
    },
    /// Create a new user (the password is stored unhashed)
    CreateUser {
        /// The username for the new user
        username: String,
        /// The email address for the new user
        email: String,
        /// The password for the new user
        password: String,
    },
    /// Delete a user by their username
    DeleteUser {
        /// The username of the user to delete
        username: String,
    },
    /// Find users by a partial, case-sensitive match of username or email
    SearchUsers {
        /// Partial username or email to search for
        query: String,
    },
    /// List users using limit and offset for pagination
    ListUsers {
        /// Maximum number of users to return
        #[arg(default_value_t = Page::DEFAULT_LIMIT)]
        limit: u32,
        /// Number of users to skip before returning results
        #[arg(default_value_t = Page::DEFAULT_OFFSET)]
        offset: u32,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Diagnostics go to stderr; stdout carries command results only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{output}");
            }
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, CommandError> {
    let mut config = StoreConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config = config.with_database_url(url);
    }
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let store = Store::connect(&config).await?;
    let result = dispatch(&store, cli.command, format).await;
    store.close().await;
    result
}

async fn dispatch(
    store: &Store,
    command: Commands,
    format: OutputFormat,
) -> Result<String, CommandError> {
    match command {
        Commands::Initialize => commands::schema::initialize(store, format).await,
        Commands::GetUser { username } => commands::users::get(store, &username, format).await,
        Commands::GetAllUsers => commands::users::get_all(store, format).await,
        Commands::ChangeEmail {
            username,
            new_email,
        } => commands::users::change_email(store, &username, &new_email, format).await,
        Commands::CreateUser {
            username,
            email,
            password,
        } => commands::users::create(store, &username, &email, &password, format).await,
        Commands::DeleteUser { username } => {
            commands::users::delete(store, &username, format).await
        }
        Commands::SearchUsers { query } => commands::users::search(store, &query, format).await,
        Commands::ListUsers { limit, offset } => {
            commands::users::list(store, Page::new(limit, offset), format).await
        }
    }
}
