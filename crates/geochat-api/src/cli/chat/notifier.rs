//! Terminal adapters for the controller's notification and wake-lock ports.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use console::style;
use tracing::{debug, info};

use geochat_core::chat::{Notification, NotificationStyle, Notifier, WakeLock};

/// Prints notifications as dim status lines, or as JSON lines.
///
/// In the chat loop `W` is the readline `SharedWriter`, so lines appear above
/// the prompt.
pub struct ConsoleNotifier<W> {
    out: Mutex<W>,
    json: bool,
}

impl<W: Write + Send> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            json: false,
        }
    }

    /// Write `{"type":"notification",..}` lines instead of styled text.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// JSON rendering of a notification, one line.
pub fn render_notification_json(notification: &Notification) -> String {
    let style = match notification.style {
        NotificationStyle::Simple => "simple",
        NotificationStyle::Expandable => "expandable",
    };
    serde_json::json!({
        "type": "notification",
        "style": style,
        "title": notification.title,
        "body": notification.body,
    })
    .to_string()
}

/// Styled rendering of a notification.
pub fn render_notification(notification: &Notification) -> String {
    match notification.style {
        NotificationStyle::Simple => format!(
            "  {} {} {}",
            style("*").blue().bold(),
            style(&notification.title).bold(),
            style(&notification.body).dim()
        ),
        NotificationStyle::Expandable => format!(
            "  {} {}\n    {}",
            style("*").blue().bold(),
            style(&notification.title).bold(),
            style(&notification.body).dim()
        ),
    }
}

impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn notify(&self, notification: Notification) {
        let line = if self.json {
            render_notification_json(&notification)
        } else {
            render_notification(&notification)
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{line}");
    }

    fn cancel_all(&self) {
        debug!("notifications cleared");
    }
}

/// Wake lock for a terminal process: there is nothing to hold, so it only
/// records and logs the lifecycle.
#[derive(Debug, Default)]
pub struct LoggingWakeLock {
    held: AtomicBool,
}

impl LoggingWakeLock {
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

impl WakeLock for LoggingWakeLock {
    fn acquire(&self) {
        self.held.store(true, Ordering::SeqCst);
        info!("wake lock acquired");
    }

    fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        info!("wake lock released");
    }
}
