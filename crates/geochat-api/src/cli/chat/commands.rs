//! Slash command parsing for the chat loop.
//!
//! Lines starting with `/` control the session; everything else is sent as a
//! chat message.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum SlashCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Leave the chat and end the session.
    Leave,
    /// Show recent stored messages.
    History,
    /// Simulate an incoming message, optionally as `user: text`.
    Receive {
        user_name: Option<String>,
        text: Option<String>,
    },
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(SlashCommand::Help),
        "/clear" | "/cls" => Some(SlashCommand::Clear),
        "/leave" | "/exit" | "/quit" | "/q" => Some(SlashCommand::Leave),
        "/history" => Some(SlashCommand::History),
        "/receive" | "/recv" => Some(parse_receive(arg)),
        other => Some(SlashCommand::Unknown(other.to_string())),
    }
}

/// `/receive`, `/receive text` or `/receive user: text`.
fn parse_receive(arg: &str) -> SlashCommand {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    match arg.split_once(':') {
        Some((user, text)) => SlashCommand::Receive {
            user_name: non_empty(user),
            text: non_empty(text),
        },
        None => SlashCommand::Receive {
            user_name: None,
            text: non_empty(arg),
        },
    }
}

/// Plain one-line command list, used where styled help cannot be printed.
pub const HELP_SUMMARY: &str =
    "Commands: /help, /clear, /history, /receive [user: text], /leave. Ctrl+D leaves the chat.";

/// Help text listing all available commands.
pub fn help_text() -> String {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/history", "Show recent messages"),
        ("/receive", "Simulate an incoming message (/receive [user: text])"),
        ("/leave", "Leave the chat and end the session"),
    ];

    let mut out = format!("\n  {}\n\n", style("Available commands:").bold());
    for (cmd, description) in rows {
        out.push_str(&format!("  {} {description}\n", style(format!("{cmd:<10}")).cyan()));
    }
    out.push_str(&format!(
        "\n  {}\n",
        style("Ctrl+D leaves the chat, Ctrl+C is ignored").dim()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(SlashCommand::Help));
        assert_eq!(parse("/h"), Some(SlashCommand::Help));
        assert_eq!(parse("/?"), Some(SlashCommand::Help));
    }

    #[test]
    fn test_parse_leave_aliases() {
        assert_eq!(parse("/leave"), Some(SlashCommand::Leave));
        assert_eq!(parse("/exit"), Some(SlashCommand::Leave));
        assert_eq!(parse("/QUIT"), Some(SlashCommand::Leave));
    }

    #[test]
    fn test_parse_clear_and_history() {
        assert_eq!(parse("/cls"), Some(SlashCommand::Clear));
        assert_eq!(parse("  /history  "), Some(SlashCommand::History));
    }

    #[test]
    fn test_parse_receive_bare() {
        assert_eq!(
            parse("/receive"),
            Some(SlashCommand::Receive {
                user_name: None,
                text: None
            })
        );
    }

    #[test]
    fn test_parse_receive_text_only() {
        assert_eq!(
            parse("/receive hello there"),
            Some(SlashCommand::Receive {
                user_name: None,
                text: Some("hello there".to_string())
            })
        );
    }

    #[test]
    fn test_parse_receive_user_and_text() {
        assert_eq!(
            parse("/receive Bob: see you at 10:30"),
            Some(SlashCommand::Receive {
                user_name: Some("Bob".to_string()),
                text: Some("see you at 10:30".to_string())
            })
        );
    }

    #[test]
    fn test_parse_receive_blank_user() {
        assert_eq!(
            parse("/receive : hi"),
            Some(SlashCommand::Receive {
                user_name: None,
                text: Some("hi".to_string())
            })
        );
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/join now"),
            Some(SlashCommand::Unknown("/join".to_string()))
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for cmd in ["/help", "/clear", "/history", "/receive", "/leave"] {
            assert!(help.contains(cmd), "missing {cmd}");
            assert!(HELP_SUMMARY.contains(cmd), "summary missing {cmd}");
        }
    }
}
