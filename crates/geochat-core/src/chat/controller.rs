//! Session state machine.
//!
//! `SessionController` is the single authority over session state. It
//! dispatches commands, writes messages to the store, drives the inactivity
//! timer, and publishes a `ChatEvent` for every transition.
//!
//! | Command          | From           | Events                                 | Store | Timer  |
//! |------------------|----------------|----------------------------------------|-------|--------|
//! | `JoinChat`       | any            | `Connected`, `UserJoined(name, 1)`     | -     | start  |
//! | `LeaveChat`      | `Connected`    | `UserLeft(name, 0)`, `NotConnected`    | -     | cancel |
//! | `SendMessage`    | `Connected`    | `NewMessage(name, text)`               | 1     | start  |
//! | `ReceiveMessage` | any            | `NewMessage(sender, text)`             | 1     | -      |
//!
//! Expiry of the timer publishes `SessionTimeout` and then runs the leave
//! transition.

use std::sync::Arc;

use geochat_types::command::ChatCommand;
use geochat_types::config::{ChatConfig, DEFAULT_USER_NAME};
use geochat_types::error::ChatError;
use geochat_types::event::ChatEvent;
use geochat_types::message::MessageRecord;
use geochat_types::session::SessionState;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::chat::ports::{NoopNotifier, NoopWakeLock, Notification, Notifier, WakeLock};
use crate::chat::timer::SessionTimer;
use crate::event::EventBus;
use crate::store::MessageStore;

/// Sender used for `ReceiveMessage` without an explicit user.
pub const SIMULATED_USER: &str = "Test User";

/// Text used for `ReceiveMessage` without an explicit body.
pub const SIMULATED_TEXT: &str = "Simulated Message";

/// Result of a command that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command changed state or recorded a message.
    Applied,
    /// The command was accepted but had no effect.
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The command requires a connected session.
    NotConnected,
    /// The command code is not recognised.
    UnknownCommand(i32),
}

/// Message carried by `SessionTimeout`.
pub fn timeout_message(minutes: u32) -> String {
    format!("Session closed after reaching the limit: {minutes} min.")
}

/// State machine for one chat session.
///
/// Generic over `MessageStore` so the core never depends on a concrete
/// storage backend.
pub struct SessionController<S: MessageStore> {
    config: ChatConfig,
    state: SessionState,
    user_name: String,
    store: S,
    timer: SessionTimer,
    events: EventBus,
    notifier: Arc<dyn Notifier>,
    wake_lock: Arc<dyn WakeLock>,
    wake_lock_held: bool,
    stop_requested: bool,
}

impl<S: MessageStore> SessionController<S> {
    /// Create a disconnected controller with no-op notifier and wake lock.
    pub fn new(config: ChatConfig, store: S) -> Self {
        let events = EventBus::new(config.event_capacity);
        let user_name = config.resolve_user_name(None);
        Self {
            config,
            state: SessionState::Disconnected,
            user_name,
            store,
            timer: SessionTimer::new(),
            events,
            notifier: Arc::new(NoopNotifier),
            wake_lock: Arc::new(NoopWakeLock),
            wake_lock_held: false,
            stop_requested: false,
        }
    }

    /// Publish on an existing bus instead of a private one.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_wake_lock(mut self, wake_lock: Arc<dyn WakeLock>) -> Self {
        self.wake_lock = wake_lock;
        self
    }

    // --- Accessors ---

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Name the current (or next) session runs under.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// Seconds of inactivity counted by the session timer.
    pub fn elapsed_ticks(&self) -> u64 {
        self.timer.elapsed_ticks()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Whether a leave asked the host to stop the service.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Replace the configuration.
    ///
    /// Takes effect on the next join and the next timer start; a running
    /// session keeps its user name.
    pub fn apply_config(&mut self, config: ChatConfig) {
        info!(
            user_name = %config.user_name,
            session_timeout = config.session_timeout,
            "configuration reloaded"
        );
        if !self.state.is_connected() {
            self.user_name = config.resolve_user_name(None);
        }
        self.config = config;
    }

    // --- Commands ---

    /// Dispatch one command.
    ///
    /// Only storage failures are errors; commands that do not apply in the
    /// current state come back as [`CommandOutcome::Ignored`].
    pub async fn handle(&mut self, command: ChatCommand) -> Result<CommandOutcome, ChatError> {
        debug!(command = command.name(), code = command.code(), "received command");
        self.acquire_wake_lock();

        match command {
            ChatCommand::JoinChat { user_name } => Ok(self.join(user_name.as_deref())),
            ChatCommand::LeaveChat => Ok(self.leave()),
            ChatCommand::SendMessage { text } => self.send(text).await,
            ChatCommand::ReceiveMessage { user_name, text } => {
                let sender = user_name
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| SIMULATED_USER.to_string());
                let text = text.unwrap_or_else(|| SIMULATED_TEXT.to_string());
                self.receive(sender, text).await
            }
            ChatCommand::Unknown(code) => {
                warn!(code, "ignoring unknown command");
                Ok(CommandOutcome::Ignored(IgnoreReason::UnknownCommand(code)))
            }
        }
    }

    fn join(&mut self, requested: Option<&str>) -> CommandOutcome {
        let user_name = self.config.resolve_user_name(requested);
        if user_name == DEFAULT_USER_NAME {
            debug!("no user name configured, joining as default");
        }
        if self.state.is_connected() {
            info!(user_name = %user_name, "re-announcing join");
        } else {
            info!(user_name = %user_name, "joining chat");
        }

        self.notifier.notify(Notification::simple(
            "Joining Chat...",
            format!("Connecting as User: {user_name}"),
        ));

        self.user_name = user_name;
        self.state = SessionState::Connected;
        self.stop_requested = false;
        self.events.publish(ChatEvent::Connected);
        self.events.publish(ChatEvent::UserJoined {
            user_name: self.user_name.clone(),
            count: 1,
        });
        self.timer.start(self.config.session_timeout);

        CommandOutcome::Applied
    }

    fn leave(&mut self) -> CommandOutcome {
        if !self.state.is_connected() {
            debug!("leave while disconnected, nothing to do");
            return CommandOutcome::Ignored(IgnoreReason::NotConnected);
        }

        info!(user_name = %self.user_name, "leaving chat");
        self.notifier
            .notify(Notification::simple("Leaving Chat...", "Disconnecting"));

        self.events.publish(ChatEvent::UserLeft {
            user_name: self.user_name.clone(),
            count: 0,
        });
        self.events.publish(ChatEvent::NotConnected);
        self.timer.cancel();
        self.state = SessionState::Disconnected;
        self.stop_requested = true;

        CommandOutcome::Applied
    }

    async fn send(&mut self, text: String) -> Result<CommandOutcome, ChatError> {
        if !self.state.is_connected() {
            warn!("ignoring send while disconnected");
            return Ok(CommandOutcome::Ignored(IgnoreReason::NotConnected));
        }

        let record = self
            .store
            .insert(MessageRecord::new(self.user_name.clone(), text.clone()))
            .await?;
        debug!(id = ?record.id(), "sent message stored");

        self.notifier
            .notify(Notification::expandable("Sending message...", text.clone()));
        self.events.publish(ChatEvent::NewMessage {
            user_name: self.user_name.clone(),
            text,
        });
        self.timer.start(self.config.session_timeout);

        Ok(CommandOutcome::Applied)
    }

    async fn receive(&mut self, sender: String, text: String) -> Result<CommandOutcome, ChatError> {
        let record = self
            .store
            .insert(MessageRecord::new(sender.clone(), text.clone()))
            .await?;
        debug!(id = ?record.id(), sender = %sender, "received message stored");

        self.notifier.notify(Notification::expandable(
            format!("New message...: {sender}"),
            text.clone(),
        ));
        self.events.publish(ChatEvent::NewMessage {
            user_name: sender,
            text,
        });

        Ok(CommandOutcome::Applied)
    }

    // --- Timeout ---

    /// Resolves when the inactivity timer expires.
    ///
    /// Cancel safe, for use in `tokio::select!`.
    pub async fn timer_expired(&mut self) {
        self.timer.expired().await;
    }

    /// Close the session after the timer expired.
    pub fn on_timeout(&mut self) -> CommandOutcome {
        if !self.state.is_connected() {
            debug!("timeout while disconnected, nothing to do");
            return CommandOutcome::Ignored(IgnoreReason::NotConnected);
        }

        let minutes = self.timer.duration_minutes();
        info!(minutes, user_name = %self.user_name, "session timed out");
        self.events.publish(ChatEvent::SessionTimeout {
            message: timeout_message(minutes),
        });
        self.leave()
    }

    // --- Lifecycle ---

    fn acquire_wake_lock(&mut self) {
        if !self.wake_lock_held {
            debug!("acquiring wake lock");
            self.wake_lock.acquire();
            self.wake_lock_held = true;
        }
    }

    /// Tear down: stop the timer, clear notifications, release the wake lock.
    ///
    /// The wake lock is released at most once per acquisition.
    pub fn shutdown(&mut self) {
        self.timer.cancel();
        self.notifier.cancel_all();
        if self.wake_lock_held {
            debug!("releasing wake lock");
            self.wake_lock.release();
            self.wake_lock_held = false;
        }
    }
}

impl<S: MessageStore> std::fmt::Debug for SessionController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("user_name", &self.user_name)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}
