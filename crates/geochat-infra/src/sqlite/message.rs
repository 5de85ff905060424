//! SQLite message store implementation.
//!
//! Implements `MessageStore` from `geochat-core` using sqlx with split
//! read/write pools. Insertion order is kept by the `seq` autoincrement
//! column; `created_at` is stored as RFC 3339 text.

use chrono::{DateTime, Utc};
use geochat_core::store::MessageStore;
use geochat_types::error::StoreError;
use geochat_types::message::MessageRecord;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageStore`.
#[derive(Clone, Debug)]
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// The most recent `limit` records, oldest first.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<MessageRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM (SELECT * FROM chat_messages ORDER BY seq DESC LIMIT ?) ORDER BY seq ASC",
        )
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        rows_into_records(&rows)
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    id: String,
    author: String,
    body: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            author: row.try_get("author")?,
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<MessageRecord, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid message id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;
        Ok(MessageRecord::restore(id, self.author, self.body, created_at))
    }
}

fn rows_into_records(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<MessageRecord>, StoreError> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let message_row =
            MessageRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
        records.push(message_row.into_record()?);
    }
    Ok(records)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StoreError::Connection,
        other => StoreError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// MessageStore implementation
// ---------------------------------------------------------------------------

impl MessageStore for SqliteMessageStore {
    async fn insert(&self, record: MessageRecord) -> Result<MessageRecord, StoreError> {
        let record = record.with_id(Uuid::now_v7());
        let id = record.id().map(|id| id.to_string()).unwrap_or_default();

        sqlx::query(
            "INSERT INTO chat_messages (id, author, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(record.author())
        .bind(record.body())
        .bind(format_datetime(&record.created_at()))
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<MessageRecord>, StoreError> {
        let rows = sqlx::query("SELECT * FROM chat_messages ORDER BY seq ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows_into_records(&rows)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_keeps_timestamp() {
        let store = SqliteMessageStore::new(test_pool().await);
        let record = MessageRecord::new("Alice", "hi");
        let created = record.created_at();

        let stored = store.insert(record).await.unwrap();

        assert!(stored.id().is_some());
        assert_eq!(stored.created_at(), created);
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let store = SqliteMessageStore::new(test_pool().await);
        for body in ["hi", "there", "again"] {
            store.insert(MessageRecord::new("Alice", body)).await.unwrap();
        }

        let records = store.list_all().await.unwrap();
        let bodies: Vec<&str> = records.iter().map(|r| r.body()).collect();
        assert_eq!(bodies, vec!["hi", "there", "again"]);
        assert!(records.iter().all(|r| r.author() == "Alice"));
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_fields() {
        let store = SqliteMessageStore::new(test_pool().await);
        let stored = store
            .insert(MessageRecord::new("Bob", ""))
            .await
            .unwrap();

        let loaded = store.list_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), stored.id());
        assert_eq!(loaded[0].body(), "");
        assert_eq!(
            loaded[0].created_at().timestamp_micros(),
            stored.created_at().timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_ids_unique_and_count() {
        let store = SqliteMessageStore::new(test_pool().await);
        for i in 0..10 {
            store
                .insert(MessageRecord::new("Carol", format!("m{i}")))
                .await
                .unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 10);
        let ids: HashSet<_> = store
            .list_all()
            .await
            .unwrap()
            .iter()
            .filter_map(|r| r.id())
            .collect();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_conflict() {
        let store = SqliteMessageStore::new(test_pool().await);
        let id = Uuid::now_v7();
        store
            .insert(MessageRecord::new("Alice", "one").with_id(id))
            .await
            .unwrap();

        let err = store
            .insert(MessageRecord::new("Alice", "two").with_id(id))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_recent_returns_tail_oldest_first() {
        let store = SqliteMessageStore::new(test_pool().await);
        for i in 0..5 {
            store
                .insert(MessageRecord::new("Dan", format!("m{i}")))
                .await
                .unwrap();
        }

        let recent = store.list_recent(2).await.unwrap();
        let bodies: Vec<&str> = recent.iter().map(|r| r.body()).collect();
        assert_eq!(bodies, vec!["m3", "m4"]);
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("persist.db").display());

        {
            let pool = DatabasePool::new(&url).await.unwrap();
            let store = SqliteMessageStore::new(pool.clone());
            store.insert(MessageRecord::new("Eve", "kept")).await.unwrap();
            pool.writer.close().await;
            pool.reader.close().await;
        }

        let store = SqliteMessageStore::new(DatabasePool::new(&url).await.unwrap());
        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body(), "kept");
    }
}
