//! Event types for the GeoChat event bus.
//!
//! `ChatEvent` is broadcast by the session controller after every state
//! transition. All variants are Clone + Send + Sync for use with tokio
//! broadcast channels.

use serde::{Deserialize, Serialize};

/// Events emitted by the chat session service.
///
/// Consumed by UI components, notification presenters, and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// The session is connected.
    Connected,

    /// The session is no longer connected.
    NotConnected,

    /// A user joined the chat.
    UserJoined { user_name: String, count: u32 },

    /// A user left the chat.
    UserLeft { user_name: String, count: u32 },

    /// A message was sent or received.
    NewMessage { user_name: String, text: String },

    /// The session was closed after the inactivity limit.
    SessionTimeout { message: String },
}

impl ChatEvent {
    /// Stable event name, used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::Connected => "connected",
            ChatEvent::NotConnected => "not_connected",
            ChatEvent::UserJoined { .. } => "user_joined",
            ChatEvent::UserLeft { .. } => "user_left",
            ChatEvent::NewMessage { .. } => "new_message",
            ChatEvent::SessionTimeout { .. } => "session_timeout",
        }
    }
}
