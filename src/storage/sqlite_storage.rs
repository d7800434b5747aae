use crate::{
    error::{KanbanError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

/// SQLite-backed slot storage
pub struct SqliteStorage {
    connection: Mutex<Connection>,
}

impl SqliteStorage {
    const SCHEMA: &'static str =
        "CREATE TABLE IF NOT EXISTS slots (key TEXT PRIMARY KEY, value TEXT NOT NULL)";

    /// Opens (or creates) the database at `database_path`
    pub fn new(database_path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(database_path)?)
    }

    /// Opens a private in-memory database
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        connection.execute(Self::SCHEMA, [])?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| KanbanError::StorageError("SQLite connection poisoned".to_string()))
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let connection = self.connection()?;
        let value = connection
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        let connection = self.connection()?;
        connection.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    async fn remove_slot(&self, key: &str) -> Result<()> {
        let connection = self.connection()?;
        connection.execute("DELETE FROM slots WHERE key = ?1", params![key])?;
        Ok(())
    }
}
