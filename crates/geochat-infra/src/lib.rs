//! Infrastructure layer for GeoChat.
//!
//! Contains implementations of the ports defined in `geochat-core`: the
//! SQLite message store, the `config.toml` loader, and data directory
//! resolution.

pub mod config;
pub mod paths;
pub mod sqlite;
