//! Configuration loader for GeoChat.
//!
//! Reads `config.toml` from the data directory (`~/.geochat/` in production)
//! and validates it into a [`ChatConfig`]. Falls back to defaults when the
//! file is missing or malformed, and per field when a single value is
//! invalid. Loading never fails.

use std::path::Path;

use geochat_types::config::{ChatConfig, RawChatConfig};
use geochat_types::error::ConfigError;

use crate::paths::config_path;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ChatConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Invalid fields (e.g. a non-numeric `session_timeout`) are logged and
///   replaced by their defaults; the remaining fields are kept.
pub async fn load_chat_config(data_dir: &Path) -> ChatConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return ChatConfig::default();
        }
        Err(err) => {
            let err = ConfigError::Read(err.to_string());
            tracing::warn!("{err} ({}), using defaults", path.display());
            return ChatConfig::default();
        }
    };

    match parse_chat_config(&content) {
        Ok((config, problems)) => {
            for problem in problems {
                tracing::warn!("{problem} in {}, using default", path.display());
            }
            config
        }
        Err(err) => {
            tracing::warn!("{err} ({}), using defaults", path.display());
            ChatConfig::default()
        }
    }
}

/// Parse and validate `config.toml` contents.
///
/// Returns the config plus any per-field problems that were replaced by
/// defaults.
pub fn parse_chat_config(content: &str) -> Result<(ChatConfig, Vec<ConfigError>), ConfigError> {
    let raw: RawChatConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(raw.resolve())
}

/// Apply command-line overrides on top of a loaded config.
pub fn with_overrides(
    mut config: ChatConfig,
    user_name: Option<String>,
    session_timeout: Option<u32>,
) -> ChatConfig {
    if let Some(name) = user_name.filter(|n| !n.trim().is_empty()) {
        config.user_name = name.trim().to_string();
    }
    if let Some(minutes) = session_timeout {
        config.session_timeout = minutes;
    }
    config
}
