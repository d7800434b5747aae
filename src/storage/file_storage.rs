use crate::{
    error::{KanbanError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// File-based storage: one JSON file per slot
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const KANBAN_DIR: &'static str = ".kanban";
    const SLOT_EXTENSION: &'static str = "json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::KANBAN_DIR),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn slot_file(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(KanbanError::StorageError(format!(
                "Invalid slot key '{}'",
                key
            )));
        }
        Ok(self
            .root_path
            .join(format!("{}.{}", key, Self::SLOT_EXTENSION)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.slot_file(key)?;

        if !file_path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&file_path).await?;
        match String::from_utf8(bytes) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) => {
                // Corrupt contents read as an empty slot
                warn!(path = %file_path.display(), error = %err, "slot file is not valid UTF-8");
                Ok(None)
            }
        }
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        let file_path = self.slot_file(key)?;
        self.ensure_directory_exists(&self.root_path).await?;

        fs::write(&file_path, value).await?;
        debug!(path = %file_path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    async fn remove_slot(&self, key: &str) -> Result<()> {
        let file_path = self.slot_file(key)?;

        if file_path.exists() {
            fs::remove_file(file_path).await?;
        }
        Ok(())
    }
}
