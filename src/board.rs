//! Application-level owner of the store and the event bus.
//!
//! Build one [`Board`] when the application starts and hand references to the
//! components that need it; call [`Board::shutdown`] on the way out.

use crate::{
    config::StoreConfig,
    error::Result,
    events::{EventBus, KanbanEvent},
    storage::Storage,
    store::KanbanStore,
};
use serde_json::Value;
use tracing::info;

/// Payload field naming the column targeted by `shuffle-cards`
pub const COLUMN_PAYLOAD_FIELD: &str = "column";

pub struct Board<S: Storage> {
    pub store: KanbanStore<S>,
    pub bus: EventBus,
}

impl<S: Storage> Board<S> {
    /// Restores the store from `storage` and creates an empty bus
    pub async fn start(storage: S, config: StoreConfig) -> Result<Self> {
        let store = KanbanStore::open(storage, config).await?;
        info!(columns = store.columns_count(), "board started");
        Ok(Self {
            store,
            bus: EventBus::new(),
        })
    }

    /// Applies the store side of `event`, then broadcasts it
    ///
    /// `shuffle-cards` targets the column named by a `{"column": n}` payload,
    /// or every column when there is none. `sort-cards` only broadcasts.
    pub async fn dispatch(&mut self, event: KanbanEvent, payload: Option<&Value>) -> Result<()> {
        match event {
            KanbanEvent::ShuffleColumns => self.store.shuffle_columns().await?,
            KanbanEvent::ShuffleCards => match target_column(payload) {
                Some(index) => self.store.shuffle_cards(index).await?,
                None => {
                    for index in 0..self.store.columns_count() {
                        self.store.shuffle_cards(index).await?;
                    }
                }
            },
            KanbanEvent::SortCards => {}
        }

        self.bus.emit(event, payload);
        Ok(())
    }

    /// Writes the final state and drops every bus handler
    pub async fn shutdown(mut self) -> Result<S> {
        self.store.persist().await?;
        self.bus.clear();
        info!("board shut down");
        Ok(self.store.into_storage())
    }
}

fn target_column(payload: Option<&Value>) -> Option<usize> {
    payload?
        .get(COLUMN_PAYLOAD_FIELD)?
        .as_u64()
        .and_then(|index| usize::try_from(index).ok())
}
