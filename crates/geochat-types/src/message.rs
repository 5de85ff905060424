//! Chat message record type.
//!
//! A `MessageRecord` is created by the session controller with its author,
//! body, and creation timestamp. The id is left empty until a message store
//! accepts the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// A single chat message.
///
/// Fields are read-only after construction. A store attaches the id through
/// [`MessageRecord::with_id`], which consumes the unsaved record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    id: Option<Uuid>,
    author: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl MessageRecord {
    /// Create an unsaved record stamped with the current time.
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            author: author.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild a record that was previously persisted.
    pub fn restore(
        id: Uuid,
        author: String,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            author,
            body,
            created_at,
        }
    }

    /// Attach a store-assigned id.
    ///
    /// An id that is already present is kept.
    pub fn with_id(self, id: Uuid) -> Self {
        Self {
            id: Some(self.id.unwrap_or(id)),
            ..self
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether a store has accepted this record.
    pub fn is_stored(&self) -> bool {
        self.id.is_some()
    }
}

impl fmt::Display for MessageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.author, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_no_id() {
        let record = MessageRecord::new("Alice", "hi");
        assert!(record.id().is_none());
        assert!(!record.is_stored());
        assert_eq!(record.author(), "Alice");
        assert_eq!(record.body(), "hi");
    }

    #[test]
    fn with_id_keeps_timestamp() {
        let record = MessageRecord::new("Alice", "hi");
        let created = record.created_at();
        let stored = record.with_id(Uuid::now_v7());
        assert!(stored.is_stored());
        assert_eq!(stored.created_at(), created);
    }

    #[test]
    fn with_id_does_not_replace_existing_id() {
        let first = Uuid::now_v7();
        let record = MessageRecord::new("Alice", "hi").with_id(first);
        let again = record.with_id(Uuid::now_v7());
        assert_eq!(again.id(), Some(first));
    }

    #[test]
    fn empty_body_is_allowed() {
        let record = MessageRecord::new("Bob", "");
        assert_eq!(record.body(), "");
        assert_eq!(record.to_string(), "Bob: ");
    }

    #[test]
    fn record_serializes_with_snake_case_fields() {
        let record = MessageRecord::new("Alice", "hello").with_id(Uuid::now_v7());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"author\":\"Alice\""));
        assert!(json.contains("\"created_at\""));
    }
}
