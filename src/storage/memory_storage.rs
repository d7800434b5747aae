use crate::{error::Result, storage::Storage};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage that lives only as long as the process
///
/// Useful for ephemeral boards and for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage with `value` already stored under `key`
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.into(), value.into());
        Self {
            slots: RwLock::new(slots),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read_slot(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_slot(&self, key: &str) -> Result<()> {
        self.slots.write().await.remove(key);
        Ok(())
    }
}
