//! Configuration types for GeoChat.
//!
//! `ChatConfig` is the validated configuration handed to the session
//! controller. `RawChatConfig` mirrors `config.toml` as written, where the
//! session timeout may be an integer or a string of digits (the way
//! preference screens store it).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Display name used when none is configured.
pub const DEFAULT_USER_NAME: &str = "Default Name";

/// Session inactivity limit in minutes when none is configured.
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: u32 = 5;

/// Broadcast channel capacity when none is configured.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Validated configuration for the chat session service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Display name used for joins and sent messages.
    #[serde(default = "default_user_name")]
    pub user_name: String,

    /// Inactivity limit in minutes. `0` disables the timeout.
    #[serde(default = "default_session_timeout")]
    pub session_timeout: u32,

    /// Capacity of the event broadcast channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_user_name() -> String {
    DEFAULT_USER_NAME.to_string()
}

fn default_session_timeout() -> u32 {
    DEFAULT_SESSION_TIMEOUT_MINUTES
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            user_name: default_user_name(),
            session_timeout: default_session_timeout(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl ChatConfig {
    /// Resolve the name a session should run under.
    ///
    /// A non-blank explicit name wins, then the configured name, then
    /// [`DEFAULT_USER_NAME`].
    pub fn resolve_user_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or_else(|| Some(self.user_name.trim()).filter(|name| !name.is_empty()))
            .unwrap_or(DEFAULT_USER_NAME)
            .to_string()
    }
}

/// Session timeout as it appears in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeoutValue {
    Minutes(i64),
    Text(String),
}

impl TimeoutValue {
    /// Parse into whole minutes.
    pub fn minutes(&self) -> Result<u32, ConfigError> {
        let parsed = match self {
            TimeoutValue::Minutes(m) => u32::try_from(*m).ok(),
            TimeoutValue::Text(s) => s.trim().parse::<u32>().ok(),
        };
        parsed.ok_or_else(|| ConfigError::InvalidTimeout(self.to_string()))
    }
}

impl std::fmt::Display for TimeoutValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutValue::Minutes(m) => write!(f, "{m}"),
            TimeoutValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Unvalidated `config.toml` contents. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChatConfig {
    pub user_name: Option<String>,
    pub session_timeout: Option<TimeoutValue>,
    pub event_capacity: Option<usize>,
}

impl RawChatConfig {
    /// Validate into a [`ChatConfig`].
    ///
    /// Invalid fields fall back to their defaults; the problems found are
    /// returned alongside so the caller can report them.
    pub fn resolve(self) -> (ChatConfig, Vec<ConfigError>) {
        let mut problems = Vec::new();
        let mut config = ChatConfig::default();

        if let Some(name) = self.user_name {
            if !name.trim().is_empty() {
                config.user_name = name.trim().to_string();
            }
        }

        if let Some(value) = self.session_timeout {
            match value.minutes() {
                Ok(minutes) => config.session_timeout = minutes,
                Err(err) => problems.push(err),
            }
        }

        match self.event_capacity {
            Some(0) => problems.push(ConfigError::Parse(
                "event_capacity must be greater than zero".to_string(),
            )),
            Some(capacity) => config.event_capacity = capacity,
            None => {}
        }

        (config, problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(toml_str: &str) -> RawChatConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_chat_config_default_values() {
        let config = ChatConfig::default();
        assert_eq!(config.user_name, "Default Name");
        assert_eq!(config.session_timeout, 5);
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn test_resolve_empty_file_gives_defaults() {
        let (config, problems) = raw("").resolve();
        assert_eq!(config, ChatConfig::default());
        assert!(problems.is_empty());
    }

    #[test]
    fn test_resolve_integer_timeout() {
        let (config, problems) = raw("user_name = \"Alice\"\nsession_timeout = 10").resolve();
        assert_eq!(config.user_name, "Alice");
        assert_eq!(config.session_timeout, 10);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_resolve_string_timeout() {
        let (config, problems) = raw("session_timeout = \"15\"").resolve();
        assert_eq!(config.session_timeout, 15);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_resolve_unparsable_timeout_falls_back() {
        let (config, problems) = raw("session_timeout = \"soon\"").resolve();
        assert_eq!(config.session_timeout, DEFAULT_SESSION_TIMEOUT_MINUTES);
        assert_eq!(problems.len(), 1);
        assert!(matches!(problems[0], ConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn test_resolve_negative_timeout_falls_back() {
        let (config, problems) = raw("session_timeout = -3").resolve();
        assert_eq!(config.session_timeout, DEFAULT_SESSION_TIMEOUT_MINUTES);
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_resolve_zero_timeout_is_kept() {
        let (config, problems) = raw("session_timeout = 0").resolve();
        assert_eq!(config.session_timeout, 0);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_resolve_blank_name_uses_default() {
        let (config, _) = raw("user_name = \"   \"").resolve();
        assert_eq!(config.user_name, DEFAULT_USER_NAME);
    }

    #[test]
    fn test_resolve_zero_capacity_rejected() {
        let (config, problems) = raw("event_capacity = 0").resolve();
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_resolve_user_name_priority() {
        let config = ChatConfig {
            user_name: "Configured".to_string(),
            ..ChatConfig::default()
        };
        assert_eq!(config.resolve_user_name(Some("Explicit")), "Explicit");
        assert_eq!(config.resolve_user_name(Some("  ")), "Configured");
        assert_eq!(config.resolve_user_name(None), "Configured");

        let blank = ChatConfig {
            user_name: String::new(),
            ..ChatConfig::default()
        };
        assert_eq!(blank.resolve_user_name(None), DEFAULT_USER_NAME);
    }

    #[test]
    fn test_chat_config_serde_roundtrip() {
        let config = ChatConfig {
            user_name: "Zed".to_string(),
            session_timeout: 2,
            event_capacity: 32,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ChatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
