//! In-process message store.

use std::sync::Arc;

use geochat_types::error::StoreError;
use geochat_types::message::MessageRecord;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::MessageStore;

/// `MessageStore` backed by a shared vector.
///
/// Cloning shares the underlying log, so a UI reader can hold a clone while
/// the controller appends.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    records: Arc<RwLock<Vec<MessageRecord>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, record: MessageRecord) -> Result<MessageRecord, StoreError> {
        let mut records = self.records.write().await;

        let stored = record.with_id(Uuid::now_v7());
        if records.iter().any(|r| r.id() == stored.id()) {
            return Err(StoreError::Conflict(format!(
                "message id already stored: {}",
                stored.id().map(|id| id.to_string()).unwrap_or_default()
            )));
        }

        records.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<MessageRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().await.len() as u64)
    }
}
