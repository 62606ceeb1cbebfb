//! # Crewdeck Shared Library
//!
//! This crate contains the types, persistence layer, and business logic shared
//! between the crewdeck API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication primitives (passwords, JWTs, request context)
//! - `board`: Kanban/timeline projections and drag resolution
//! - `events`: Per-project change-notification hub
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod board;
pub mod db;
pub mod events;
pub mod models;

/// Current version of the crewdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
