//! Chat session lifecycle for GeoChat.
//!
//! `SessionController` owns the state machine, `SessionTimer` the inactivity
//! countdown, and `ChatService` runs a controller as a background task.

pub mod controller;
pub mod ports;
pub mod service;
pub mod timer;

pub use controller::{CommandOutcome, IgnoreReason, SessionController};
pub use ports::{Notification, NotificationStyle, Notifier, WakeLock};
pub use service::{ChatService, ChatServiceHandle};
pub use timer::SessionTimer;
