//! Main chat loop orchestration.
//!
//! Spawns the chat service, joins, then turns each input line into a
//! command until the user leaves, presses Ctrl+D, or the session times out.

use std::io::Write;
use std::sync::Arc;

use console::style;
use rustyline_async::SharedWriter;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use geochat_core::chat::service::DEFAULT_QUEUE_CAPACITY;
use geochat_core::chat::{
    ChatService, ChatServiceHandle, CommandOutcome, IgnoreReason, SessionController,
};
use geochat_core::event::EventBus;
use geochat_infra::config::with_overrides;
use geochat_types::command::ChatCommand;
use geochat_types::error::ChatError;
use geochat_types::event::ChatEvent;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, SlashCommand};
use super::input::{ChatInput, InputEvent};
use super::notifier::{ConsoleNotifier, LoggingWakeLock};
use super::renderer::{NoticeLevel, render_event, render_history_line, render_notice};

/// Messages shown by `/history`.
const HISTORY_PREVIEW: i64 = 20;

/// What the loop should do after a command was answered.
#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Stop,
}

/// How session output is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    /// Every line on stdout is a JSON object.
    pub json: bool,
    /// Skip the banner and the closing line.
    pub quiet: bool,
}

impl OutputMode {
    fn decorated(self) -> bool {
        !self.json && !self.quiet
    }
}

/// Run an interactive chat session.
pub async fn run_chat_loop(
    state: &AppState,
    name: Option<String>,
    timeout: Option<u32>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let json = mode.json;
    let config = with_overrides(state.config.clone(), name, timeout);

    if mode.decorated() {
        print_welcome_banner(&config.user_name, config.session_timeout, &state.data_dir);
    }

    let prompt = format!("  {} ", style(format!("{} >", config.user_name)).green().bold());
    let (mut chat_input, mut writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let events = EventBus::new(config.event_capacity);
    let controller = SessionController::new(config, state.store.clone())
        .with_event_bus(events)
        .with_notifier(Arc::new(ConsoleNotifier::new(writer.clone()).with_json(json)))
        .with_wake_lock(Arc::new(LoggingWakeLock::default()));

    let (handle, service) = ChatService::spawn(controller, DEFAULT_QUEUE_CAPACITY);
    let printer = tokio::spawn(print_events(handle.subscribe(), writer.clone(), json));

    handle
        .send(ChatCommand::JoinChat { user_name: None })
        .await?;

    loop {
        let event = tokio::select! {
            event = chat_input.read_line() => event,
            () = handle.stopped() => {
                info!("chat service stopped, closing session");
                break;
            }
        };

        match event {
            InputEvent::Eof => {
                leave(&handle, &mut writer, json).await;
                break;
            }
            InputEvent::Interrupted => {
                let _ = writeln!(
                    writer,
                    "{}",
                    render_notice(NoticeLevel::Info, "Press Ctrl+D or type /leave to exit.", json)
                );
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                let flow = match commands::parse(&text) {
                    Some(SlashCommand::Help) => {
                        if json {
                            let _ = writeln!(
                                writer,
                                "{}",
                                render_notice(NoticeLevel::Info, commands::HELP_SUMMARY, true)
                            );
                        } else {
                            let _ = write!(writer, "{}", commands::help_text());
                        }
                        Flow::Continue
                    }
                    Some(SlashCommand::Clear) => {
                        chat_input.clear();
                        Flow::Continue
                    }
                    Some(SlashCommand::History) => {
                        show_recent(state, &mut writer, json).await;
                        Flow::Continue
                    }
                    Some(SlashCommand::Leave) => {
                        leave(&handle, &mut writer, json).await;
                        Flow::Stop
                    }
                    Some(SlashCommand::Receive { user_name, text }) => {
                        let result = handle
                            .send(ChatCommand::ReceiveMessage { user_name, text })
                            .await;
                        report(result, &mut writer, json)
                    }
                    Some(SlashCommand::Unknown(cmd)) => {
                        let message =
                            format!("Unknown command: {cmd}. Type /help for available commands.");
                        let _ = writeln!(
                            writer,
                            "{}",
                            render_notice(NoticeLevel::Warn, &message, json)
                        );
                        Flow::Continue
                    }
                    None => {
                        let result = handle.send(ChatCommand::SendMessage { text }).await;
                        report(result, &mut writer, json)
                    }
                };

                if flow == Flow::Stop {
                    break;
                }
            }
        }
    }

    // Dropping the last handle closes the command queue and the event bus.
    drop(handle);
    if let Err(e) = service.await {
        warn!(error = %e, "chat service task failed");
    }
    if let Err(e) = printer.await {
        warn!(error = %e, "event printer task failed");
    }
    chat_input.flush();
    drop(chat_input);

    if mode.decorated() {
        println!("\n  {}", style("Session ended.").dim());
    }
    Ok(())
}

/// Leave the chat. Leaving an already closed session prints nothing.
async fn leave(handle: &ChatServiceHandle, writer: &mut SharedWriter, json: bool) {
    if let Err(e) = handle.send(ChatCommand::LeaveChat).await {
        report(Err(e), writer, json);
    }
}

/// Print anything the user should know about a command's outcome.
fn report(result: Result<CommandOutcome, ChatError>, writer: &mut impl Write, json: bool) -> Flow {
    let (level, message) = match result {
        Ok(CommandOutcome::Applied) => return Flow::Continue,
        Err(ChatError::ServiceStopped) => return Flow::Stop,
        Ok(CommandOutcome::Ignored(IgnoreReason::NotConnected)) => (
            NoticeLevel::Warn,
            "Not connected. The message was not sent.".to_string(),
        ),
        Ok(CommandOutcome::Ignored(IgnoreReason::UnknownCommand(code))) => {
            (NoticeLevel::Warn, format!("Command {code} is not supported."))
        }
        Err(e) => (NoticeLevel::Error, e.to_string()),
    };
    let _ = writeln!(writer, "{}", render_notice(level, &message, json));
    Flow::Continue
}

async fn show_recent(state: &AppState, writer: &mut impl Write, json: bool) {
    match state.store.list_recent(HISTORY_PREVIEW).await {
        Ok(records) if records.is_empty() => {
            let _ = writeln!(
                writer,
                "{}",
                render_notice(NoticeLevel::Info, "No messages yet.", json)
            );
        }
        Ok(records) => {
            for record in &records {
                let _ = writeln!(writer, "{}", render_history_line(record, json));
            }
        }
        Err(e) => {
            let message = format!("Failed to load history: {e}");
            let _ = writeln!(writer, "{}", render_notice(NoticeLevel::Error, &message, json));
        }
    }
}

/// Print every session event until the bus closes.
async fn print_events(
    mut rx: broadcast::Receiver<ChatEvent>,
    mut writer: impl Write,
    json: bool,
) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                let _ = writeln!(writer, "{}", render_event(&event, json));
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "event printer lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
