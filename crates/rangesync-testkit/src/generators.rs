//! Proptest generators for property-based testing.

use proptest::prelude::*;
use rangesync_core::{Id, Item};

/// Generate a random id of exactly `id_size` bytes.
pub fn id(id_size: usize) -> impl Strategy<Value = Id> {
    prop::collection::vec(any::<u8>(), id_size)
        .prop_map(|bytes| Id::from_slice(&bytes).expect("id within storage width"))
}

/// Generate an item timestamp.
///
/// `u64::MAX` is excluded: it is the open top of the reconciled domain
/// (and the wire sentinel), so items never carry it.
pub fn timestamp() -> impl Strategy<Value = u64> {
    0..u64::MAX
}

/// Generate a random item with an `id_size`-byte id.
pub fn item(id_size: usize) -> impl Strategy<Value = Item> {
    (timestamp(), id(id_size)).prop_map(|(timestamp, id)| Item::new(timestamp, id))
}

/// Generate up to `max_len` random items.
pub fn items(id_size: usize, max_len: usize) -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(item(id_size), 0..=max_len)
}

/// Generate two peers' sets as `(shared, only_a, only_b)`.
pub fn split_sets(
    id_size: usize,
    max_shared: usize,
    max_unique: usize,
) -> impl Strategy<Value = (Vec<Item>, Vec<Item>, Vec<Item>)> {
    (
        prop::collection::vec(item(id_size), 0..=max_shared),
        prop::collection::vec(item(id_size), 0..=max_unique),
        prop::collection::vec(item(id_size), 0..=max_unique),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_ids_have_exact_length(id in id(8)) {
            prop_assert_eq!(id.len(), 8);
        }

        #[test]
        fn generated_items_sort_totally(mut set in items(8, 20)) {
            set.sort();
            for pair in set.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }
    }
}
