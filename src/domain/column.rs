use crate::domain::sort_state::SortState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card on the board
///
/// The store never inspects cards; their shape belongs to the caller.
pub type Card = serde_json::Value;

/// A named lane holding an ordered list of cards
///
/// Columns have no id. A column is addressed by its position in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub title: String,
    #[serde(default)]
    pub sort_state: Option<SortState>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Time of the last change to this column, stored as epoch milliseconds
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_edit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

fn default_enabled() -> bool {
    true
}

impl Column {
    /// Creates an enabled, empty, never-edited column
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sort_state: None,
            enabled: true,
            last_edit: None,
            cards: Vec::new(),
        }
    }

    /// Shallow-merges `update` onto the column and stamps `last_edit`
    pub fn apply(&mut self, update: ColumnUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(sort_state) = update.sort_state {
            self.sort_state = sort_state;
        }
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
        if let Some(cards) = update.cards {
            self.cards = cards;
        }
        self.touch();
    }

    /// Appends a card and stamps `last_edit`
    pub fn push_card(&mut self, card: Card) {
        self.cards.push(card);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_edit = Some(Utc::now());
    }
}

/// Input for `KanbanStore::add_column`
///
/// Only the title is taken from the caller; everything else starts fresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewColumn {
    pub title: Option<String>,
}

impl NewColumn {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }

    /// Builds the column, using `fallback` when the title is missing or empty
    pub fn into_column(self, fallback: &str) -> Column {
        let title = self
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Column::new(title)
    }
}

/// Partial column update for `KanbanStore::update_column`
///
/// Fields left as `None` keep their current value. `sort_state` is doubly
/// optional so an update can clear it with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnUpdate {
    pub title: Option<String>,
    pub sort_state: Option<Option<SortState>>,
    pub enabled: Option<bool>,
    pub cards: Option<Vec<Card>>,
}

impl ColumnUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_sort_state(mut self, sort_state: Option<SortState>) -> Self {
        self.sort_state = Some(sort_state);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = Some(cards);
        self
    }
}
