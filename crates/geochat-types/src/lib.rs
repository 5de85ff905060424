//! Shared domain types for GeoChat.
//!
//! Message records, session state, commands, events, configuration, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod session;
