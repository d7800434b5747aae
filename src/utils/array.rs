//! Sequence helpers used when reordering or bucketing board data.

use rand::Rng;
use serde_json::Value;
use std::{collections::HashMap, hash::Hash};

/// Returns a uniformly shuffled copy of `items`
///
/// The input is left untouched. Uses the thread-local generator; see
/// [`shuffle_with`] to supply your own.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::rng())
}

/// Fisher-Yates shuffle of a copy of `items` driven by `rng`
///
/// # Examples
/// ```
/// use kanban_state::utils::array::shuffle_with;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut shuffled = shuffle_with(&[1, 2, 3, 4], &mut rng);
/// shuffled.sort();
/// assert_eq!(shuffled, vec![1, 2, 3, 4]);
/// ```
pub fn shuffle_with<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.random_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Groups `items` by the key `key_fn` extracts from each one
///
/// Groups come out in the order their key was first seen, and items keep
/// their input order within a group.
pub fn group_by<T, K, F>(items: &[T], mut key_fn: F) -> Vec<(K, Vec<T>)>
where
    T: Clone,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let key = key_fn(item);
        match positions.get(&key) {
            Some(&pos) => groups[pos].1.push(item.clone()),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![item.clone()]));
            }
        }
    }

    groups
}

/// Groups JSON values by the value of `field`
///
/// Items without the field (including non-objects) land in the `None`
/// bucket. An explicit `null` is a real value and gets its own
/// `Some(Value::Null)` bucket.
pub fn group_by_field(items: &[Value], field: &str) -> Vec<(Option<Value>, Vec<Value>)> {
    let mut groups: Vec<(Option<Value>, Vec<Value>)> = Vec::new();

    for item in items {
        let key = item.get(field).cloned();
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(item.clone()),
            None => groups.push((key, vec![item.clone()])),
        }
    }

    groups
}
