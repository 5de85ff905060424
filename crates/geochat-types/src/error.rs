use thiserror::Error;

/// Errors from message store operations (used by trait definitions in geochat-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors returned by the chat session service.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("chat service is stopped")]
    ServiceStopped,
}

/// Errors related to configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid session timeout: '{0}'")]
    InvalidTimeout(String),

    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_from_store_error() {
        let err: ChatError = StoreError::Connection.into();
        assert!(matches!(err, ChatError::Storage(StoreError::Connection)));
        assert_eq!(err.to_string(), "storage failure: database connection error");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidTimeout("abc".to_string());
        assert_eq!(err.to_string(), "invalid session timeout: 'abc'");
    }
}
