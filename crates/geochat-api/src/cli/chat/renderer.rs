//! Rendering of session events for the terminal.

use console::style;

use geochat_types::event::ChatEvent;
use geochat_types::message::MessageRecord;

/// Styled text for an event, or JSON when `json` is set.
pub fn render_event(event: &ChatEvent, json: bool) -> String {
    if json {
        return serde_json::to_string(event).unwrap_or_else(|_| format!("{event:?}"));
    }

    match event {
        ChatEvent::Connected => format!("  {} {}", style("●").green(), style("connected").dim()),
        ChatEvent::NotConnected => {
            format!("  {} {}", style("○").dim(), style("disconnected").dim())
        }
        ChatEvent::UserJoined { user_name, count } => format!(
            "  {} {} joined ({count} online)",
            style("→").green().bold(),
            style(user_name).bold()
        ),
        ChatEvent::UserLeft { user_name, count } => format!(
            "  {} {} left ({count} online)",
            style("←").yellow().bold(),
            style(user_name).bold()
        ),
        ChatEvent::NewMessage { user_name, text } => {
            format!("  {} {text}", style(format!("{user_name}:")).cyan().bold())
        }
        ChatEvent::SessionTimeout { message } => {
            format!("  {} {}", style("!").yellow().bold(), style(message).yellow())
        }
    }
}

/// Severity of a status line shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

impl NoticeLevel {
    fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warn => "warn",
            NoticeLevel::Error => "error",
        }
    }
}

/// A status line, or `{"type":"notice","level":..,"message":..}` when `json`
/// is set.
pub fn render_notice(level: NoticeLevel, message: &str, json: bool) -> String {
    if json {
        return serde_json::json!({
            "type": "notice",
            "level": level.as_str(),
            "message": message,
        })
        .to_string();
    }

    match level {
        NoticeLevel::Info => format!("  {}", style(message).dim()),
        NoticeLevel::Warn => format!("  {} {message}", style("!").yellow().bold()),
        NoticeLevel::Error => format!("  {} {message}", style("!").red().bold()),
    }
}

/// One history line, or the record as JSON when `json` is set.
pub fn render_history_line(record: &MessageRecord, json: bool) -> String {
    if json {
        return serde_json::to_string(record).unwrap_or_else(|_| format!("{record:?}"));
    }
    render_record(record)
}

/// One history line: UTC time, author and body.
pub fn render_record(record: &MessageRecord) -> String {
    format!(
        "  {} {} {}",
        style(record.created_at().format("%H:%M:%S")).dim(),
        style(format!("{}:", record.author())).cyan(),
        record.body()
    )
}
