//! userctl store - `SQLite` persistence for the user table.
//!
//! # Architecture
//!
//! - [`config`] - [`StoreConfig`] loaded from the environment
//! - [`db`] - connection pool, scoped [`Session`]s, schema and the user repository
//! - [`services`] - the user operations, each returning a typed outcome
//!
//! Every operation acquires exactly one [`Session`]. Writes are committed
//! explicitly; a session dropped without a commit is rolled back and its
//! connection is returned to the pool.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod services;

pub use config::{ConfigError, StoreConfig};
pub use db::{RepositoryError, Session, Store, UserRepository};
