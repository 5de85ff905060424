//! Interactive chat session.
//!
//! Runs a `ChatService` for the lifetime of the session and bridges it to
//! the terminal: typed lines become commands, broadcast events and
//! notifications are printed above the prompt. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod notifier;
pub mod renderer;
