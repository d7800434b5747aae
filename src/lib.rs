//! # Kanban State
//!
//! Client-side state layer for a kanban board: a persisted store of columns
//! and cards, generic array helpers (shuffle, group-by) and a small event bus
//! used by UI components to coordinate actions such as shuffling columns.
//!
//! Nothing here renders anything. UI collaborators read from and write to a
//! [`KanbanStore`] and talk to each other through an [`EventBus`], both owned
//! by a [`Board`] constructed once at application start.

pub mod board;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod storage;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use board::Board;
pub use config::StoreConfig;
pub use domain::{Card, Column, ColumnUpdate, NewColumn, SortState};
pub use error::{KanbanError, Result};
pub use events::{EventBus, KanbanEvent, SubscriptionId};
pub use storage::Storage;
pub use store::KanbanStore;
