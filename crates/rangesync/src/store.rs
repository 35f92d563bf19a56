//! Item storage: append-only until sealed, sorted and frozen afterwards.

use std::cmp::Ordering;

use rangesync_core::{Bound, Error, Item, Result};

/// Owns the item set for one session.
///
/// Items accumulate in arbitrary insertion order; `seal` sorts them
/// ascending by `(timestamp, id)` and freezes the set. Range lookups are
/// only meaningful after sealing.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    sealed: bool,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. Fails once the set is sealed.
    pub fn add(&mut self, item: Item) -> Result<()> {
        if self.sealed {
            return Err(Error::AlreadySealed);
        }
        self.items.push(item);
        Ok(())
    }

    /// Sort ascending and freeze. Fails on a second call.
    ///
    /// Duplicate items are kept; the protocol carries them as two entries.
    pub fn seal(&mut self) -> Result<()> {
        if self.sealed {
            return Err(Error::AlreadySealed);
        }
        self.items.sort_unstable();
        self.sealed = true;
        Ok(())
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The full item slice, sorted once sealed.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// First index at or after `from` whose item sorts strictly after
    /// `bound`.
    pub fn upper_bound(&self, from: usize, bound: &Bound) -> usize {
        from + self.items[from..].partition_point(|item| bound.cmp_item(item) != Ordering::Less)
    }
}
