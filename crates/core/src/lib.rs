//! userctl core - Shared user types.
//!
//! This crate provides the domain types used across the userctl components:
//! - `store` - `SQLite` persistence, sessions and user operations
//! - `cli` - The `userctl` command dispatcher
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access. Enabling
//! the `sqlite` feature adds the `sqlx` encode/decode impls for the ID types.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, the `User` entity and pagination windows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
