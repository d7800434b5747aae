use crate::error::Result;
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Durable key-value slots the board state is written through to
///
/// Values are opaque strings; the store decides what goes in them.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the value stored under `key`, or `None` if the slot is empty
    async fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`
    async fn write_slot(&self, key: &str, value: &str) -> Result<()>;

    /// Empties the slot; removing a missing key is not an error
    async fn remove_slot(&self, key: &str) -> Result<()>;
}
