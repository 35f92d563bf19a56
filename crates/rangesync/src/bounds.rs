//! Minimal separating bounds between adjacent items.

use rangesync_core::{Bound, Id, Item};

/// Compute the shortest bound `b` with `prev < b <= curr` for adjacent
/// items `prev < curr`.
///
/// When the timestamps differ, the timestamp alone disambiguates and the
/// id prefix is empty. Otherwise the prefix is one byte longer than the
/// shared prefix of the two ids, clamped to the full id for equal
/// (duplicate) neighbours.
pub fn minimal_separating_bound(prev: &Item, curr: &Item, id_size: usize) -> Bound {
    if curr.timestamp != prev.timestamp {
        return Bound::new(curr.timestamp, Id::EMPTY);
    }

    let shared = prev
        .id
        .as_bytes()
        .iter()
        .zip(curr.id.as_bytes())
        .take(id_size)
        .take_while(|(p, c)| p == c)
        .count();
    Bound::new(curr.timestamp, curr.id.prefix(shared + 1))
}
