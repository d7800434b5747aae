//! Column/card store with write-through persistence.
//!
//! Every mutation that changes the board writes the full column list to the
//! configured storage slot before returning. Out-of-range indices are ignored
//! without an error: the call simply has no effect.

pub mod persistence;

use crate::{
    config::StoreConfig,
    domain::{Card, Column, ColumnUpdate, NewColumn, SortState},
    error::Result,
    storage::Storage,
    utils::array::shuffle,
};
use tracing::{debug, info};

pub struct KanbanStore<S: Storage> {
    columns: Vec<Column>,
    storage: S,
    config: StoreConfig,
}

impl<S: Storage> KanbanStore<S> {
    /// Restores the store from `storage`, seeding defaults if it comes back empty
    ///
    /// A missing or unreadable slot restores as an empty board and is then
    /// seeded. Errors from the backend itself are returned.
    pub async fn open(storage: S, config: StoreConfig) -> Result<Self> {
        config.validate()?;

        let raw = storage.read_slot(&config.storage_key).await?;
        let columns = persistence::deserialize_columns(raw.as_deref());
        info!(
            key = %config.storage_key,
            columns = columns.len(),
            "restored kanban columns"
        );

        let mut store = Self {
            columns,
            storage,
            config,
        };
        if store.columns.is_empty() {
            store.initialize_store().await?;
        }
        Ok(store)
    }

    /// Seeds the default columns if the store is empty
    ///
    /// Does nothing when at least one column exists.
    pub async fn initialize_store(&mut self) -> Result<()> {
        if !self.columns.is_empty() {
            return Ok(());
        }

        let seeded: Vec<Column> = self
            .config
            .seed_titles
            .iter()
            .map(|title| Column::new(title.as_str()))
            .collect();
        self.commit(seeded).await?;
        info!(columns = self.columns.len(), "seeded default columns");
        Ok(())
    }

    /// Appends a fresh column; only the title is taken from `column`
    pub async fn add_column(&mut self, column: NewColumn) -> Result<()> {
        let column = column.into_column(&self.config.default_column_title);
        debug!(title = %column.title, "adding column");
        let mut columns = self.columns.clone();
        columns.push(column);
        self.commit(columns).await
    }

    /// Removes the column at `index`
    pub async fn delete_column(&mut self, index: usize) -> Result<()> {
        if index >= self.columns.len() {
            debug!(index, count = self.columns.len(), "delete_column: index out of range");
            return Ok(());
        }

        let mut columns = self.columns.clone();
        columns.remove(index);
        self.commit(columns).await
    }

    /// Shallow-merges `updates` onto the column at `index` and stamps `last_edit`
    pub async fn update_column(&mut self, index: usize, updates: ColumnUpdate) -> Result<()> {
        if index >= self.columns.len() {
            debug!(index, "update_column: index out of range");
            return Ok(());
        }

        let mut columns = self.columns.clone();
        columns[index].apply(updates);
        self.commit(columns).await
    }

    /// Records a sort direction on the column at `index`
    pub async fn set_sort_state(
        &mut self,
        index: usize,
        sort_state: Option<SortState>,
    ) -> Result<()> {
        self.update_column(index, ColumnUpdate::new().with_sort_state(sort_state))
            .await
    }

    /// Appends `card` to the column at `column_index`
    pub async fn add_card(&mut self, column_index: usize, card: Card) -> Result<()> {
        if column_index >= self.columns.len() {
            debug!(column_index, "add_card: index out of range");
            return Ok(());
        }

        let mut columns = self.columns.clone();
        columns[column_index].push_card(card);
        self.commit(columns).await
    }

    /// Reorders the columns randomly
    ///
    /// Column contents, including `last_edit`, are left as they are.
    pub async fn shuffle_columns(&mut self) -> Result<()> {
        let columns = shuffle(&self.columns);
        self.commit(columns).await
    }

    /// Reorders the cards of the column at `column_index` randomly
    pub async fn shuffle_cards(&mut self, column_index: usize) -> Result<()> {
        if column_index >= self.columns.len() {
            debug!(column_index, "shuffle_cards: index out of range");
            return Ok(());
        }

        let mut columns = self.columns.clone();
        let column = &mut columns[column_index];
        column.cards = shuffle(&column.cards);
        column.touch();
        self.commit(columns).await
    }

    /// Empties the board
    ///
    /// Defaults are not re-seeded here; the next [`KanbanStore::open`] does that.
    pub async fn clear_store(&mut self) -> Result<()> {
        self.commit(Vec::new()).await?;
        info!("cleared kanban store");
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn columns_count(&self) -> usize {
        self.columns.len()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    /// Gives back the storage backend, dropping the in-memory state
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Writes the current columns to the storage slot
    pub(crate) async fn persist(&self) -> Result<()> {
        self.write_columns(&self.columns).await
    }

    /// Writes `columns` and adopts them only once the write succeeded
    async fn commit(&mut self, columns: Vec<Column>) -> Result<()> {
        self.write_columns(&columns).await?;
        self.columns = columns;
        Ok(())
    }

    async fn write_columns(&self, columns: &[Column]) -> Result<()> {
        let raw = persistence::serialize_columns(columns)?;
        self.storage.write_slot(&self.config.storage_key, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::KanbanError, storage::MemoryStorage};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Memory storage that counts writes
    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        writes: AtomicUsize,
    }

    impl CountingStorage {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Storage for CountingStorage {
        async fn read_slot(&self, key: &str) -> Result<Option<String>> {
            self.inner.read_slot(key).await
        }

        async fn write_slot(&self, key: &str, value: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.write_slot(key, value).await
        }

        async fn remove_slot(&self, key: &str) -> Result<()> {
            self.inner.remove_slot(key).await
        }
    }

    /// Storage whose writes always fail
    struct ReadOnlyStorage;

    #[async_trait]
    impl Storage for ReadOnlyStorage {
        async fn read_slot(&self, _key: &str) -> Result<Option<String>> {
            Ok(Some(r#"[{"title": "Only"}]"#.to_string()))
        }

        async fn write_slot(&self, _key: &str, _value: &str) -> Result<()> {
            Err(KanbanError::StorageError("read-only".to_string()))
        }

        async fn remove_slot(&self, _key: &str) -> Result<()> {
            Err(KanbanError::StorageError("read-only".to_string()))
        }
    }

    async fn seeded_store() -> KanbanStore<CountingStorage> {
        KanbanStore::open(CountingStorage::default(), StoreConfig::default())
            .await
            .unwrap()
    }

    fn titles<S: Storage>(store: &KanbanStore<S>) -> Vec<&str> {
        store.columns().iter().map(|c| c.title.as_str()).collect()
    }

    fn assert_recent(column: &Column) {
        let last_edit = column.last_edit.expect("last_edit should be set");
        let age = Utc::now() - last_edit;
        assert!(age < chrono::Duration::seconds(5), "stale last_edit {last_edit}");
    }

    #[tokio::test]
    async fn test_open_empty_storage_seeds_defaults() {
        let store = seeded_store().await;

        assert_eq!(titles(&store), vec!["Todo", "In progress", "Done"]);
        for column in store.columns() {
            assert!(column.cards.is_empty());
            assert!(column.enabled);
            assert_eq!(column.sort_state, None);
            assert!(column.last_edit.is_none());
        }

        let raw = store.storage().read_slot("kanban_columns").await.unwrap();
        assert_eq!(persistence::deserialize_columns(raw.as_deref()).len(), 3);
    }

    #[tokio::test]
    async fn test_open_restores_persisted_columns() {
        let raw = r#"[{"title": "Backlog", "sort_state": "desc", "enabled": false,
                       "last_edit": null, "cards": [{"text": "a"}]}]"#;
        let store = KanbanStore::open(
            MemoryStorage::with_slot("kanban_columns", raw),
            StoreConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(titles(&store), vec!["Backlog"]);
        let column = store.column(0).unwrap();
        assert_eq!(column.sort_state, Some(SortState::Descending));
        assert!(!column.enabled);
        assert_eq!(column.cards, vec![json!({"text": "a"})]);
    }

    #[tokio::test]
    async fn test_open_corrupt_slot_reseeds() {
        let store = KanbanStore::open(
            MemoryStorage::with_slot("kanban_columns", "{definitely not columns"),
            StoreConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(titles(&store), vec!["Todo", "In progress", "Done"]);
    }

    #[tokio::test]
    async fn test_open_persisted_empty_list_reseeds() {
        let store = KanbanStore::open(
            MemoryStorage::with_slot("kanban_columns", "[]"),
            StoreConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(store.columns_count(), 3);
    }

    #[tokio::test]
    async fn test_open_uses_configured_key() {
        let config = StoreConfig::default().with_storage_key("work_board");
        let storage = MemoryStorage::with_slot("kanban_columns", r#"[{"title": "Other"}]"#);

        let store = KanbanStore::open(storage, config).await.unwrap();

        assert_eq!(store.columns_count(), 3);
        assert!(store.storage().read_slot("work_board").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_open_rejects_invalid_config() {
        let config = StoreConfig::default().with_storage_key("");
        let result = KanbanStore::open(MemoryStorage::new(), config).await;
        assert!(matches!(result, Err(KanbanError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_initialize_store_is_noop_when_populated() {
        let mut store = seeded_store().await;
        store.add_card(0, json!("card")).await.unwrap();
        let before = store.columns().to_vec();
        let writes = store.storage().writes();

        store.initialize_store().await.unwrap();

        assert_eq!(store.columns(), before.as_slice());
        assert_eq!(store.storage().writes(), writes);
    }

    #[tokio::test]
    async fn test_seeded_columns_are_independent() {
        let mut first = seeded_store().await;
        first.add_card(0, json!("only here")).await.unwrap();

        let second = seeded_store().await;
        assert!(second.column(0).unwrap().cards.is_empty());

        first.clear_store().await.unwrap();
        first.initialize_store().await.unwrap();
        assert!(first.column(0).unwrap().cards.is_empty());
    }

    #[tokio::test]
    async fn test_add_column() {
        let mut store = seeded_store().await;

        store.add_column(NewColumn::titled("X")).await.unwrap();
        store.add_column(NewColumn::default()).await.unwrap();
        store.add_column(NewColumn::titled("")).await.unwrap();

        assert_eq!(
            titles(&store),
            vec!["Todo", "In progress", "Done", "X", "New Column", "New Column"]
        );
        let added = store.column(3).unwrap();
        assert!(added.cards.is_empty());
        assert!(added.enabled);
        assert!(added.last_edit.is_none());
    }

    #[tokio::test]
    async fn test_add_column_uses_configured_fallback() {
        let config = StoreConfig::default().with_default_column_title("Untitled");
        let mut store = KanbanStore::open(MemoryStorage::new(), config).await.unwrap();

        store.add_column(NewColumn::default()).await.unwrap();

        assert_eq!(store.column(3).unwrap().title, "Untitled");
    }

    #[tokio::test]
    async fn test_delete_column_shifts_positions() {
        let mut store = seeded_store().await;

        store.delete_column(0).await.unwrap();

        assert_eq!(titles(&store), vec!["In progress", "Done"]);
    }

    #[tokio::test]
    async fn test_delete_column_out_of_range_is_silent() {
        let mut store = seeded_store().await;
        let before = store.columns().to_vec();
        let writes = store.storage().writes();

        store.delete_column(99).await.unwrap();
        store.delete_column(3).await.unwrap();

        assert_eq!(store.columns(), before.as_slice());
        assert_eq!(store.storage().writes(), writes);
    }

    #[tokio::test]
    async fn test_update_column_merges_and_stamps() {
        let mut store = seeded_store().await;
        store.add_card(0, json!({"text": "keep"})).await.unwrap();

        store
            .update_column(0, ColumnUpdate::new().with_enabled(false))
            .await
            .unwrap();

        let column = store.column(0).unwrap();
        assert!(!column.enabled);
        assert_eq!(column.title, "Todo");
        assert_eq!(column.cards, vec![json!({"text": "keep"})]);
        assert_recent(column);
    }

    #[tokio::test]
    async fn test_update_column_can_replace_cards() {
        let mut store = seeded_store().await;
        store.add_card(1, json!("old")).await.unwrap();

        store
            .update_column(
                1,
                ColumnUpdate::new()
                    .with_title("Doing")
                    .with_cards(vec![json!("new")]),
            )
            .await
            .unwrap();

        let column = store.column(1).unwrap();
        assert_eq!(column.title, "Doing");
        assert_eq!(column.cards, vec![json!("new")]);
    }

    #[tokio::test]
    async fn test_update_column_out_of_range_is_silent() {
        let mut store = seeded_store().await;
        let before = store.columns().to_vec();
        let writes = store.storage().writes();

        store
            .update_column(5, ColumnUpdate::new().with_title("ghost"))
            .await
            .unwrap();

        assert_eq!(store.columns(), before.as_slice());
        assert_eq!(store.storage().writes(), writes);
    }

    #[tokio::test]
    async fn test_set_sort_state() {
        let mut store = seeded_store().await;

        store
            .set_sort_state(2, Some(SortState::Ascending))
            .await
            .unwrap();
        assert_eq!(store.column(2).unwrap().sort_state, Some(SortState::Ascending));

        store.set_sort_state(2, None).await.unwrap();
        assert_eq!(store.column(2).unwrap().sort_state, None);
    }

    #[tokio::test]
    async fn test_add_card_touches_only_target_column() {
        let mut store = seeded_store().await;

        store.add_card(1, json!({"text": "task"})).await.unwrap();

        let column = store.column(1).unwrap();
        assert_eq!(column.cards, vec![json!({"text": "task"})]);
        assert_recent(column);

        for index in [0, 2] {
            let untouched = store.column(index).unwrap();
            assert!(untouched.cards.is_empty());
            assert!(untouched.last_edit.is_none());
        }
    }

    #[tokio::test]
    async fn test_add_card_out_of_range_is_silent() {
        let mut store = seeded_store().await;
        let writes = store.storage().writes();

        store.add_card(7, json!("lost")).await.unwrap();

        assert!(store.columns().iter().all(|c| c.cards.is_empty()));
        assert_eq!(store.storage().writes(), writes);
    }

    #[tokio::test]
    async fn test_clear_store_does_not_reseed() {
        let mut store = seeded_store().await;

        store.clear_store().await.unwrap();

        assert_eq!(store.columns_count(), 0);
        assert!(store.column(0).is_none());
    }

    #[tokio::test]
    async fn test_clear_then_reopen_reseeds() {
        let mut store = seeded_store().await;
        store.add_column(NewColumn::titled("Extra")).await.unwrap();
        store.clear_store().await.unwrap();

        let raw = store.storage().read_slot("kanban_columns").await.unwrap();
        assert_eq!(raw.as_deref(), Some("[]"));

        let reopened = KanbanStore::open(store.into_storage(), StoreConfig::default())
            .await
            .unwrap();
        assert_eq!(titles(&reopened), vec!["Todo", "In progress", "Done"]);
    }

    #[tokio::test]
    async fn test_clear_then_initialize_reseeds_immediately() {
        let mut store = seeded_store().await;
        store.clear_store().await.unwrap();

        store.initialize_store().await.unwrap();

        assert_eq!(store.columns_count(), 3);
    }

    #[tokio::test]
    async fn test_mutations_write_through() {
        let mut store = seeded_store().await;
        store.add_column(NewColumn::titled("Review")).await.unwrap();
        store.add_card(3, json!({"text": "check"})).await.unwrap();
        store.delete_column(0).await.unwrap();

        let reopened = KanbanStore::open(store.into_storage(), StoreConfig::default())
            .await
            .unwrap();

        assert_eq!(titles(&reopened), vec!["In progress", "Done", "Review"]);
        assert_eq!(reopened.column(2).unwrap().cards, vec![json!({"text": "check"})]);
    }

    #[tokio::test]
    async fn test_shuffle_columns_keeps_columns() {
        let mut store = seeded_store().await;
        for title in ["A", "B", "C", "D", "E"] {
            store.add_column(NewColumn::titled(title)).await.unwrap();
        }
        let mut expected: Vec<String> =
            store.columns().iter().map(|c| c.title.clone()).collect();

        store.shuffle_columns().await.unwrap();

        let mut shuffled: Vec<String> =
            store.columns().iter().map(|c| c.title.clone()).collect();
        shuffled.sort();
        expected.sort();
        assert_eq!(shuffled, expected);
        assert!(store.columns().iter().all(|c| c.last_edit.is_none()));
    }

    #[tokio::test]
    async fn test_shuffle_cards() {
        let mut store = seeded_store().await;
        for n in 0..10 {
            store.add_card(0, json!(n)).await.unwrap();
        }

        store.shuffle_cards(0).await.unwrap();
        store.shuffle_cards(42).await.unwrap();

        let mut cards: Vec<i64> = store
            .column(0)
            .unwrap()
            .cards
            .iter()
            .filter_map(|c| c.as_i64())
            .collect();
        cards.sort();
        assert_eq!(cards, (0..10).collect::<Vec<i64>>());
        assert_recent(store.column(0).unwrap());
    }

    #[tokio::test]
    async fn test_write_failures_are_returned() {
        let mut store = KanbanStore::open(ReadOnlyStorage, StoreConfig::default())
            .await
            .unwrap();

        let result = store.add_column(NewColumn::titled("X")).await;
        assert!(matches!(result, Err(KanbanError::StorageError(_))));

        // Out-of-range mutations never reach the backend
        assert!(store.delete_column(50).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_writes_leave_columns_unchanged() {
        let mut store = KanbanStore::open(ReadOnlyStorage, StoreConfig::default())
            .await
            .unwrap();
        let before = store.columns().to_vec();

        assert!(store.add_column(NewColumn::titled("X")).await.is_err());
        assert_eq!(store.columns_count(), 1);

        assert!(store.clear_store().await.is_err());
        assert_eq!(store.columns_count(), 1);

        assert!(store.add_card(0, json!("lost")).await.is_err());
        assert!(store
            .update_column(0, ColumnUpdate::new().with_title("Renamed"))
            .await
            .is_err());
        assert!(store.shuffle_cards(0).await.is_err());
        assert!(store.delete_column(0).await.is_err());

        assert_eq!(store.columns(), before.as_slice());
    }
}
