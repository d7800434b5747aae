//! Serializer/deserializer pair for the persisted column list.
//!
//! Only the columns are ever written. A missing slot and a slot that does not
//! parse as a column list both restore to an empty board.

use crate::{domain::Column, error::Result};
use tracing::warn;

/// Serializes the columns into the stored representation
pub fn serialize_columns(columns: &[Column]) -> Result<String> {
    Ok(serde_json::to_string(columns)?)
}

/// Restores columns from a stored slot value
///
/// Corrupt values are logged and treated as an empty board.
pub fn deserialize_columns(raw: Option<&str>) -> Vec<Column> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Column>>(raw) {
        Ok(columns) => columns,
        Err(err) => {
            warn!(error = %err, "discarding unreadable persisted columns");
            Vec::new()
        }
    }
}
