use crate::error::KanbanError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Board-wide UI actions broadcast over the [`EventBus`](super::EventBus)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KanbanEvent {
    ShuffleColumns,
    ShuffleCards,
    SortCards,
}

impl KanbanEvent {
    pub const ALL: [KanbanEvent; 3] = [Self::ShuffleColumns, Self::ShuffleCards, Self::SortCards];

    /// Stable wire name shared with UI components
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShuffleColumns => "shuffle-columns",
            Self::ShuffleCards => "shuffle-cards",
            Self::SortCards => "sort-cards",
        }
    }
}

impl FromStr for KanbanEvent {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| KanbanError::UnknownEvent(s.to_string()))
    }
}

impl fmt::Display for KanbanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
