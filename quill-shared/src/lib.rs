//! # Quill Shared Library
//!
//! This crate contains the data layer and authentication primitives used by
//! the Quill API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migrations
//! - `models`: Users and articles, with their repositories
//! - `auth`: Password hashing, JWT issuance and request verification

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Quill shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
