//! Message persistence abstractions.
//!
//! `MessageStore` is the append-only log the session controller writes to.
//! `InMemoryMessageStore` is the default process-local implementation; the
//! SQLite implementation lives in `geochat-infra`.

pub mod memory;

pub use memory::InMemoryMessageStore;

use geochat_types::error::StoreError;
use geochat_types::message::MessageRecord;

/// Append-only message log.
///
/// Implementations assign ids on insert and return records in insertion
/// order. There is no update or delete.
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MessageStore: Send + Sync {
    /// Append a record, assigning an id if it has none.
    ///
    /// Returns the stored record with its id populated.
    fn insert(
        &self,
        record: MessageRecord,
    ) -> impl std::future::Future<Output = Result<MessageRecord, StoreError>> + Send;

    /// All records in insertion order.
    fn list_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<MessageRecord>, StoreError>> + Send;

    /// Number of stored records.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
