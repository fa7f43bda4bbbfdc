//! Core types for userctl.
//!
//! This module provides type-safe wrappers for the user domain.

pub mod id;
pub mod page;
pub mod user;

pub use id::*;
pub use page::Page;
pub use user::{NewUser, User};
