//! Show the resolved configuration.

use anyhow::Result;
use console::style;

use geochat_infra::paths::{DATA_DIR_ENV, config_path};

use crate::state::AppState;

/// Print the configuration after defaults and fallbacks were applied.
pub fn show_config(state: &AppState, json: bool) -> Result<()> {
    let path = config_path(&state.data_dir);

    if json {
        let value = serde_json::json!({
            "config_file": path.display().to_string(),
            "config_file_exists": path.exists(),
            "config": state.config,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}{}",
        style("Config:").bold(),
        style(path.display()).dim(),
        if path.exists() {
            String::new()
        } else {
            format!(" {}", style("(not found, using defaults)").yellow())
        }
    );
    println!();
    println!("  user_name        = {}", style(&state.config.user_name).green());
    println!("  session_timeout  = {}", state.config.session_timeout);
    println!("  event_capacity   = {}", state.config.event_capacity);
    println!();
    println!(
        "  {}",
        style(format!("Set {DATA_DIR_ENV} to use another data directory.")).dim()
    );
    println!();

    Ok(())
}
