//! SQLite structured backend
//!
//! Every value lives in a single `store` table keyed by name. Each operation
//! runs in its own transaction on a blocking worker thread.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::backend::{StructuredBackend, StructuredOpener};
use crate::error::StoreError;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS store(
        key TEXT PRIMARY KEY NOT NULL,
        value BLOB NOT NULL
    );
"#;

const UPSERT: &str = "INSERT INTO store(key, value) VALUES (?1, ?2)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// Structured backend over one SQLite connection
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Open (or create) the database file and its table
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| {
            StoreError::BackendUnavailable(format!("Open DB at {}: {}", path.display(), e))
        })?;
        Self::init(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|e| {
                StoreError::BackendUnavailable(format!("Connection lock poisoned: {}", e))
            })?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::BackendUnavailable(format!("Storage task failed: {}", e)))?
    }
}

#[async_trait]
impl StructuredBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let value = tx
                .query_row(
                    "SELECT value FROM store WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()?;
            tx.commit()?;
            Ok(value)
        })
        .await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let write = |conn: &mut Connection| -> rusqlite::Result<()> {
                let tx = conn.transaction()?;
                tx.execute(UPSERT, params![key, value])?;
                tx.commit()
            };
            write(conn).map_err(|e| StoreError::write_failed(&key, e.to_string()))?;
            debug!(key = %key, "stored value in sqlite");
            Ok(())
        })
        .await
    }

    async fn put_batch(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            let write = |conn: &mut Connection| -> rusqlite::Result<()> {
                let tx = conn.transaction()?;
                for (key, value) in &entries {
                    tx.execute(UPSERT, params![key, value])?;
                }
                tx.commit()
            };
            write(conn).map_err(|e| StoreError::write_failed("<batch>", e.to_string()))?;
            debug!(count = entries.len(), "stored batch in sqlite");
            Ok(())
        })
        .await
    }
}

/// Opens a [`SqliteBackend`] at a fixed path
#[derive(Debug, Clone)]
pub struct SqliteOpener {
    path: PathBuf,
}

impl SqliteOpener {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl StructuredOpener for SqliteOpener {
    async fn open(&self) -> Result<Arc<dyn StructuredBackend>, StoreError> {
        let path = self.path.clone();
        let backend = tokio::task::spawn_blocking(move || SqliteBackend::open(&path))
            .await
            .map_err(|e| StoreError::BackendUnavailable(format!("Open task failed: {}", e)))??;
        Ok(Arc::new(backend))
    }
}
