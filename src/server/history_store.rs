//! SQLite-backed storage of saved conversation lists, one row per token.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use rusqlite::OptionalExtension;
use thiserror::Error;
use tokio_rusqlite::Connection;

use crate::conversation::Conversation;

/// Boxed future type for history store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for history store operations.
#[derive(Debug, Error)]
pub enum HistoryStoreError {
    /// `SQLite` storage error (async).
    #[error("tokio-rusqlite error: {0}")]
    TokioSqlite(#[from] tokio_rusqlite::Error),
    /// Stored payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for history store operations.
pub type HistoryStoreResult<T> = Result<T, HistoryStoreError>;

/// Trait for saved-history storage.
pub trait HistoryStore: Send + Sync {
    /// Load the list saved for `owner`.
    fn load(&self, owner: &str) -> StoreFuture<'_, HistoryStoreResult<Option<Vec<Conversation>>>>;

    /// Overwrite the list saved for `owner`.
    fn save(
        &self,
        owner: &str,
        conversations: Vec<Conversation>,
        now_ms: i64,
    ) -> StoreFuture<'_, HistoryStoreResult<()>>;
}

/// `SQLite` implementation of history storage.
pub struct SqliteHistoryStore {
    conn: Connection,
    table: String,
}

impl SqliteHistoryStore {
    /// Table name for saved histories.
    pub const DEFAULT_TABLE: &'static str = "chat_history";

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn open(path: &Path) -> HistoryStoreResult<Self> {
        let conn = Connection::open(path).await?;
        Self::new(conn).await
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn open_in_memory() -> HistoryStoreResult<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::new(conn).await
    }

    /// Initialize the store and create the table if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if database operations fail.
    pub async fn new(conn: Connection) -> HistoryStoreResult<Self> {
        let table = Self::DEFAULT_TABLE.to_string();
        let table_name = table.clone();

        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table_name} (
                    owner TEXT PRIMARY KEY,
                    payload TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                );"
            ))?;
            Ok(())
        })
        .await?;

        Ok(Self { conn, table })
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn load(&self, owner: &str) -> StoreFuture<'_, HistoryStoreResult<Option<Vec<Conversation>>>> {
        let owner = owner.to_string();
        Box::pin(async move {
            let table = self.table.clone();
            let payload = self
                .conn
                .call(move |conn| {
                    let payload = conn
                        .query_row(
                            &format!("SELECT payload FROM {table} WHERE owner = ?1"),
                            rusqlite::params![owner],
                            |row| row.get::<_, String>(0),
                        )
                        .optional()?;
                    Ok(payload)
                })
                .await?;

            match payload {
                Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
                None => Ok(None),
            }
        })
    }

    fn save(
        &self,
        owner: &str,
        conversations: Vec<Conversation>,
        now_ms: i64,
    ) -> StoreFuture<'_, HistoryStoreResult<()>> {
        let owner = owner.to_string();
        Box::pin(async move {
            let table = self.table.clone();
            let payload = serde_json::to_string(&conversations)?;
            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT INTO {table} (owner, payload, updated_at)
                             VALUES (?1, ?2, ?3)
                             ON CONFLICT(owner) DO UPDATE SET
                                payload = excluded.payload,
                                updated_at = excluded.updated_at"
                        ),
                        rusqlite::params![owner, payload, now_ms],
                    )?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }
}
