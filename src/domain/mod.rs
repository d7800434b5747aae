pub mod column;
pub mod sort_state;

pub use column::{Card, Column, ColumnUpdate, NewColumn};
pub use sort_state::SortState;
