//! Application state shared by the CLI commands.
//!
//! Resolves the data directory, loads `config.toml` and opens the SQLite
//! message store. The store is cloned into each chat session; clones share
//! the same connection pools.

use std::path::PathBuf;

use anyhow::Context;

use geochat_infra::config::load_chat_config;
use geochat_infra::paths::{database_url, resolve_data_dir};
use geochat_infra::sqlite::message::SqliteMessageStore;
use geochat_infra::sqlite::pool::DatabasePool;
use geochat_types::config::ChatConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: ChatConfig,
    pub db_pool: DatabasePool,
    pub store: SqliteMessageStore,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB.
    pub async fn init() -> anyhow::Result<Self> {
        Self::open(resolve_data_dir()).await
    }

    /// Open state rooted at an explicit data directory.
    pub async fn open(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_chat_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir))
            .await
            .context("failed to open message database")?;
        let store = SqliteMessageStore::new(db_pool.clone());

        Ok(Self {
            data_dir,
            config,
            db_pool,
            store,
        })
    }

    /// Path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("geochat.db")
    }
}
