//! Commands accepted by the chat session service.
//!
//! Commands arrive either typed (from the CLI) or as an integer code plus an
//! optional message text, which is how platform service entry points deliver
//! them. [`ChatCommand::from_code`] bridges the two.

use serde::{Deserialize, Serialize};

/// Integer code for [`ChatCommand::JoinChat`].
pub const CMD_JOIN_CHAT: i32 = 10;
/// Integer code for [`ChatCommand::LeaveChat`].
pub const CMD_LEAVE_CHAT: i32 = 20;
/// Integer code for [`ChatCommand::SendMessage`].
pub const CMD_SEND_MESSAGE: i32 = 30;
/// Integer code for [`ChatCommand::ReceiveMessage`].
pub const CMD_RECEIVE_MESSAGE: i32 = 40;

/// A single request to the session controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ChatCommand {
    /// Join the chat. `None` uses the configured display name.
    JoinChat { user_name: Option<String> },

    /// Leave the chat and stop the service.
    LeaveChat,

    /// Send a message as the session user.
    SendMessage { text: String },

    /// Deliver a message from another participant.
    ///
    /// Missing fields fall back to a simulated sender and text.
    ReceiveMessage {
        user_name: Option<String>,
        text: Option<String>,
    },

    /// A command code the service does not understand.
    Unknown(i32),
}

impl ChatCommand {
    /// Map an integer-coded request to a typed command.
    ///
    /// `message_text` is only read for [`CMD_SEND_MESSAGE`]; a send without
    /// text carries an empty body.
    pub fn from_code(code: i32, message_text: Option<String>) -> Self {
        match code {
            CMD_JOIN_CHAT => ChatCommand::JoinChat { user_name: None },
            CMD_LEAVE_CHAT => ChatCommand::LeaveChat,
            CMD_SEND_MESSAGE => ChatCommand::SendMessage {
                text: message_text.unwrap_or_default(),
            },
            CMD_RECEIVE_MESSAGE => ChatCommand::ReceiveMessage {
                user_name: None,
                text: None,
            },
            other => ChatCommand::Unknown(other),
        }
    }

    /// The integer code of this command.
    pub fn code(&self) -> i32 {
        match self {
            ChatCommand::JoinChat { .. } => CMD_JOIN_CHAT,
            ChatCommand::LeaveChat => CMD_LEAVE_CHAT,
            ChatCommand::SendMessage { .. } => CMD_SEND_MESSAGE,
            ChatCommand::ReceiveMessage { .. } => CMD_RECEIVE_MESSAGE,
            ChatCommand::Unknown(code) => *code,
        }
    }

    /// Short name for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            ChatCommand::JoinChat { .. } => "join_chat",
            ChatCommand::LeaveChat => "leave_chat",
            ChatCommand::SendMessage { .. } => "send_message",
            ChatCommand::ReceiveMessage { .. } => "receive_message",
            ChatCommand::Unknown(_) => "unknown",
        }
    }
}
