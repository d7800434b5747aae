pub mod array;

pub use array::{group_by, group_by_field, shuffle, shuffle_with};
