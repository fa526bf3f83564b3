//! Database entity models for the book catalog.
//!
//! This module contains the Sea-ORM entity definitions backing the auth and
//! book services. The schema itself is created by the migrations in
//! `crate::migration`.

/// Book records exposed through the `/books` resource.
pub mod book;

/// Bearer tokens issued at login.
pub mod session_token;

/// Registered users and their credential hashes.
pub mod user;
