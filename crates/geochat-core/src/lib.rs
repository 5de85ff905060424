//! Business logic and port trait definitions for GeoChat.
//!
//! This crate defines the "ports" (message store, notifier, wake lock) that
//! the infrastructure and API layers implement. It depends only on
//! `geochat-types` -- never on `geochat-infra` or any database/IO crate.

pub mod chat;
pub mod event;
pub mod store;
