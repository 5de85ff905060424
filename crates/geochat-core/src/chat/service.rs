//! Chat service task.
//!
//! Moves a `SessionController` onto its own tokio task and feeds it commands
//! through an mpsc queue. Commands and timer expiry are multiplexed with
//! `tokio::select!`, so every transition runs on one logical timeline.
//! The task stops after the session leaves (explicitly or by timeout) or
//! when every handle is dropped, and then shuts the controller down.

use geochat_types::command::ChatCommand;
use geochat_types::error::ChatError;
use geochat_types::event::ChatEvent;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::chat::controller::{CommandOutcome, SessionController};
use crate::event::EventBus;
use crate::store::MessageStore;

/// Default depth of the command queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

struct Envelope {
    command: ChatCommand,
    reply: oneshot::Sender<Result<CommandOutcome, ChatError>>,
}

enum Step {
    Command(Option<Envelope>),
    Timeout,
}

/// Entry point for running a controller as a background service.
pub struct ChatService;

impl ChatService {
    /// Spawn the service task.
    ///
    /// Returns a handle for sending commands and the task's join handle.
    pub fn spawn<S>(
        controller: SessionController<S>,
        queue_capacity: usize,
    ) -> (ChatServiceHandle, JoinHandle<()>)
    where
        S: MessageStore + 'static,
    {
        let (commands, rx) = mpsc::channel(queue_capacity.max(1));
        let handle = ChatServiceHandle {
            commands,
            events: controller.events().clone(),
        };
        let task = tokio::spawn(run(controller, rx));
        (handle, task)
    }
}

async fn run<S: MessageStore>(
    mut controller: SessionController<S>,
    mut commands: mpsc::Receiver<Envelope>,
) {
    info!("chat service started");

    loop {
        let step = tokio::select! {
            envelope = commands.recv() => Step::Command(envelope),
            () = controller.timer_expired() => Step::Timeout,
        };

        match step {
            Step::Command(Some(Envelope { command, reply })) => {
                let result = controller.handle(command).await;
                if let Err(err) = &result {
                    warn!(error = %err, "command failed");
                }
                let _ = reply.send(result);
            }
            Step::Command(None) => {
                debug!("all service handles dropped");
                break;
            }
            Step::Timeout => {
                controller.on_timeout();
            }
        }

        if controller.stop_requested() {
            break;
        }
    }

    controller.shutdown();
    info!("chat service stopped");
}

/// Cloneable handle to a running chat service.
#[derive(Clone, Debug)]
pub struct ChatServiceHandle {
    commands: mpsc::Sender<Envelope>,
    events: EventBus,
}

impl ChatServiceHandle {
    /// Send a command and wait for its outcome.
    ///
    /// Returns [`ChatError::ServiceStopped`] once the service has stopped.
    pub async fn send(&self, command: ChatCommand) -> Result<CommandOutcome, ChatError> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Envelope { command, reply })
            .await
            .map_err(|_| ChatError::ServiceStopped)?;
        outcome.await.map_err(|_| ChatError::ServiceStopped)?
    }

    /// Send an integer-coded command, as delivered by platform entry points.
    pub async fn dispatch(
        &self,
        code: i32,
        message_text: Option<String>,
    ) -> Result<CommandOutcome, ChatError> {
        self.send(ChatCommand::from_code(code, message_text)).await
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// Whether the service task has stopped accepting commands.
    pub fn is_stopped(&self) -> bool {
        self.commands.is_closed()
    }

    /// Resolves once the service task has stopped accepting commands.
    pub async fn stopped(&self) {
        self.commands.closed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::controller::IgnoreReason;
    use crate::chat::ports::test_support::CountingWakeLock;
    use crate::store::InMemoryMessageStore;
    use geochat_types::command::{CMD_JOIN_CHAT, CMD_LEAVE_CHAT, CMD_SEND_MESSAGE};
    use geochat_types::config::ChatConfig;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    fn spawn_service(
        timeout: u32,
    ) -> (
        ChatServiceHandle,
        JoinHandle<()>,
        InMemoryMessageStore,
        Arc<CountingWakeLock>,
    ) {
        let store = InMemoryMessageStore::new();
        let lock = Arc::new(CountingWakeLock::default());
        let config = ChatConfig {
            user_name: "Alice".to_string(),
            session_timeout: timeout,
            ..ChatConfig::default()
        };
        let controller =
            SessionController::new(config, store.clone()).with_wake_lock(lock.clone());
        let (handle, task) = ChatService::spawn(controller, DEFAULT_QUEUE_CAPACITY);
        (handle, task, store, lock)
    }

    #[tokio::test]
    async fn test_commands_flow_through_service() {
        let (handle, task, store, lock) = spawn_service(5);
        let mut rx = handle.subscribe();

        handle
            .send(ChatCommand::JoinChat { user_name: None })
            .await
            .unwrap();
        handle
            .send(ChatCommand::SendMessage {
                text: "hi".to_string(),
            })
            .await
            .unwrap();
        handle.send(ChatCommand::LeaveChat).await.unwrap();

        task.await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(rx.recv().await.unwrap(), ChatEvent::Connected);
        assert!(matches!(
            rx.recv().await.unwrap(),
            ChatEvent::UserJoined { .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            ChatEvent::NewMessage { .. }
        ));
        assert!(matches!(rx.recv().await.unwrap(), ChatEvent::UserLeft { .. }));
        assert_eq!(rx.recv().await.unwrap(), ChatEvent::NotConnected);

        assert_eq!(lock.acquired(), 1);
        assert_eq!(lock.released(), 1);
    }

    #[tokio::test]
    async fn test_send_after_stop_fails() {
        let (handle, task, _store, _lock) = spawn_service(5);

        handle
            .send(ChatCommand::JoinChat { user_name: None })
            .await
            .unwrap();
        handle.send(ChatCommand::LeaveChat).await.unwrap();
        task.await.unwrap();

        assert!(handle.is_stopped());
        let err = handle
            .send(ChatCommand::JoinChat { user_name: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::ServiceStopped));
    }

    #[tokio::test]
    async fn test_leave_while_disconnected_keeps_service_running() {
        let (handle, _task, _store, _lock) = spawn_service(5);

        let outcome = handle.send(ChatCommand::LeaveChat).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Ignored(IgnoreReason::NotConnected));
        assert!(!handle.is_stopped());
    }

    #[tokio::test]
    async fn test_dispatch_by_code() {
        let (handle, task, store, _lock) = spawn_service(5);

        handle.dispatch(CMD_JOIN_CHAT, None).await.unwrap();
        handle
            .dispatch(CMD_SEND_MESSAGE, Some("coded".to_string()))
            .await
            .unwrap();
        let unknown = handle.dispatch(55, None).await.unwrap();
        assert_eq!(unknown, CommandOutcome::Ignored(IgnoreReason::UnknownCommand(55)));
        handle.dispatch(CMD_LEAVE_CHAT, None).await.unwrap();
        task.await.unwrap();

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body(), "coded");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_stops_service() {
        let (handle, task, _store, lock) = spawn_service(1);
        let mut rx = handle.subscribe();
        let started = Instant::now();

        handle
            .send(ChatCommand::JoinChat { user_name: None })
            .await
            .unwrap();
        task.await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(60));
        let events: Vec<ChatEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[2], ChatEvent::SessionTimeout { .. }));
        assert_eq!(events[4], ChatEvent::NotConnected);
        assert_eq!(lock.released(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_resolves_after_timeout() {
        let (handle, _task, _store, _lock) = spawn_service(1);
        handle
            .send(ChatCommand::JoinChat { user_name: None })
            .await
            .unwrap();

        handle.stopped().await;
        assert!(handle.is_stopped());
    }

    #[tokio::test]
    async fn test_dropping_handles_stops_service() {
        let (handle, task, _store, lock) = spawn_service(5);
        handle
            .send(ChatCommand::JoinChat { user_name: None })
            .await
            .unwrap();

        drop(handle);
        task.await.unwrap();

        assert_eq!(lock.acquired(), 1);
        assert_eq!(lock.released(), 1);
    }
}
