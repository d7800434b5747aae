use crate::error::{KanbanError, Result};
use serde::{Deserialize, Serialize};

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key of the durable slot the columns are written to
    pub storage_key: String,
    /// Title used by `add_column` when the caller gives none
    pub default_column_title: String,
    /// Titles of the columns seeded into an empty store
    pub seed_titles: Vec<String>,
}

impl StoreConfig {
    pub const DEFAULT_STORAGE_KEY: &'static str = "kanban_columns";
    pub const DEFAULT_COLUMN_TITLE: &'static str = "New Column";

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_default_column_title(mut self, title: impl Into<String>) -> Self {
        self.default_column_title = title.into();
        self
    }

    pub fn with_seed_titles<I, T>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.seed_titles = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Checks that the configuration can back a store
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(KanbanError::ConfigError(
                "storage_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: Self::DEFAULT_STORAGE_KEY.to_string(),
            default_column_title: Self::DEFAULT_COLUMN_TITLE.to_string(),
            seed_titles: vec![
                "Todo".to_string(),
                "In progress".to_string(),
                "Done".to_string(),
            ],
        }
    }
}
