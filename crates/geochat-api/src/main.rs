//! GeoChat CLI entry point.
//!
//! Binary name: `geochat`
//!
//! Parses CLI arguments, loads configuration and opens the message database,
//! then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,geochat=debug",
        _ => "trace",
    };

    if let Err(e) = geochat_observe::tracing_setup::init_tracing(filter, cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "geochat", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Chat { name, timeout } => {
            let mode = cli::chat::loop_runner::OutputMode {
                json: cli.json,
                quiet: cli.quiet,
            };
            cli::chat::loop_runner::run_chat_loop(&state, name, timeout, mode).await
        }
        Commands::History { limit } => cli::history::show_history(&state, limit, cli.json).await,
        Commands::Config => cli::config::show_config(&state, cli.json),
        Commands::Status => cli::status::status(&state, cli.json).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    geochat_observe::tracing_setup::shutdown_tracing();
    result
}
