//! CLI command definitions and dispatch for the `geochat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod config;
pub mod history;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Join a chat session, send and receive messages, browse history.
#[derive(Parser)]
#[command(name = "geochat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log errors, and skip the chat banner and closing line.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join the chat and start an interactive session.
    Chat {
        /// Display name for this session (overrides config.toml).
        #[arg(long, env = "GEOCHAT_USER_NAME")]
        name: Option<String>,

        /// Inactivity limit in minutes; 0 disables the limit.
        #[arg(long, value_name = "MINUTES")]
        timeout: Option<u32>,
    },

    /// Show stored messages, oldest first.
    History {
        /// Number of most recent messages to show.
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },

    /// Show the resolved configuration.
    Config,

    /// Show version, storage and session settings.
    Status,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_with_overrides() {
        let cli = Cli::try_parse_from(["geochat", "chat", "--name", "Alice", "--timeout", "0"])
            .unwrap();
        match cli.command {
            Commands::Chat { name, timeout } => {
                assert_eq!(name.as_deref(), Some("Alice"));
                assert_eq!(timeout, Some(0));
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_parse_rejects_negative_timeout() {
        assert!(Cli::try_parse_from(["geochat", "chat", "--timeout", "-1"]).is_err());
    }

    #[test]
    fn test_history_default_limit_and_global_json() {
        let cli = Cli::try_parse_from(["geochat", "history", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::History { limit: 50 }));
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["geochat", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.otel);
    }
}
