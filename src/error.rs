use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown event name: {0}")]
    UnknownEvent(String),

    #[error("Invalid sort state '{0}'. Valid states: asc, desc")]
    InvalidSortState(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "sqlite-storage")]
impl From<rusqlite::Error> for KanbanError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}
