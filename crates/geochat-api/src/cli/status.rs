//! Status summary command.

use anyhow::Result;
use console::style;

use geochat_core::store::MessageStore;

use crate::state::AppState;

use super::chat::banner::describe_timeout;

/// Display version, storage location and session settings.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let message_count = state.store.count().await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database": state.database_path().display().to_string(),
            "messages": message_count,
            "user_name": state.config.user_name,
            "session_timeout": state.config.session_timeout,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} GeoChat v{}",
        style("●").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Storage ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style(state.database_path().display()).dim());
    println!("  Messages: {}", style(message_count).bold());
    println!();

    println!("  {}", style("── Session ──").dim());
    println!("  User:     {}", style(&state.config.user_name).green());
    println!(
        "  Timeout:  {}",
        describe_timeout(state.config.session_timeout)
    );
    println!();

    Ok(())
}
