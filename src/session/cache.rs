// In-memory item cache.
// The single source of truth for already-fetched items.

use std::collections::HashMap;

use tracing::trace;

use crate::api::{Item, ItemId};

/// Process-lifetime id -> item store. Append/overwrite only, no eviction;
/// growth is bounded by the total number of items ever viewed.
#[derive(Debug, Default)]
pub struct ItemCache {
    entries: HashMap<ItemId, Item>,
}

impl ItemCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Store an item, overwriting any previous entry for the id. A
    /// placeholder never replaces a resolved entry, so resolved items
    /// cannot regress. Out-of-order arrivals are fine: item content is
    /// immutable upstream, so last-write-wins.
    pub fn put(&mut self, id: ItemId, item: Item) {
        if item.is_placeholder() && self.get(id).is_some_and(|e| !e.is_placeholder()) {
            return;
        }
        trace!(id, "cache put");
        self.entries.insert(id, item);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Job;
    use chrono::DateTime;

    fn job(id: ItemId, title: &str) -> Item {
        Item::Job(Job {
            id,
            by: "pg".to_string(),
            score: 1,
            title: title.to_string(),
            url: None,
            time: DateTime::from_timestamp(1_200_000_000, 0).unwrap(),
        })
    }

    #[test]
    fn put_then_get() {
        let mut cache = ItemCache::new();
        assert!(cache.is_empty());

        cache.put(1, job(1, "first"));
        assert!(cache.contains(1));
        assert_eq!(cache.get(1), Some(&job(1, "first")));
        assert_eq!(cache.get(2), None);
    }

    #[test]
    fn overwrite_same_key() {
        let mut cache = ItemCache::new();
        cache.put(1, job(1, "first"));
        cache.put(1, job(1, "second"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1), Some(&job(1, "second")));
    }

    #[test]
    fn repeated_put_is_idempotent() {
        let mut cache = ItemCache::new();
        cache.put(1, job(1, "only"));
        cache.put(1, job(1, "only"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1), Some(&job(1, "only")));
    }

    #[test]
    fn placeholder_never_regresses_resolved_entry() {
        let mut cache = ItemCache::new();
        cache.put(1, job(1, "resolved"));
        cache.put(1, Item::Placeholder(1));

        assert_eq!(cache.get(1), Some(&job(1, "resolved")));
    }
}
