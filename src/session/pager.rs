// Page window computation over the feed id list.
// Materializes the visible slice from the cache, with placeholders for
// misses and per-id failure markers for fetches that came back in error.

use std::collections::HashMap;

use crate::api::{Item, ItemId};

use super::cache::ItemCache;

/// Stories per page, matching the upstream site.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Paging state over the ordered feed id list, plus the materialized
/// window for the current page.
#[derive(Debug)]
pub struct PageState {
    ids: Vec<ItemId>,
    page: usize,
    page_size: usize,
    items: Vec<Item>,
    /// Fetch failure messages for ids in the current window. Failed ids are
    /// not cached, so revisiting the page retries them.
    failed: HashMap<ItemId, String>,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            ids: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            items: Vec::new(),
            failed: HashMap::new(),
        }
    }

    /// Replace the id list (a fresh feed load) and reset to the first page.
    pub(crate) fn set_ids(&mut self, ids: Vec<ItemId>) {
        self.ids = ids;
        self.page = 0;
        self.items.clear();
        self.failed.clear();
    }

    /// Move to page `n`, clamped to `[0, page_count - 1]`, and materialize
    /// the window from the cache with placeholders for misses. Returns the
    /// ids that still need fetching; fetches are issued for exactly those.
    pub(crate) fn set_page(&mut self, n: usize, cache: &ItemCache) -> Vec<ItemId> {
        self.page = n.min(self.page_count().saturating_sub(1));
        self.failed.clear();
        self.materialize(cache)
    }

    /// Rebuild the current window from the cache; returns the cache misses.
    fn materialize(&mut self, cache: &ItemCache) -> Vec<ItemId> {
        let mut missing = Vec::new();
        self.items = self
            .window()
            .iter()
            .map(|&id| match cache.get(id) {
                Some(item) if !item.is_placeholder() => item.clone(),
                _ => {
                    missing.push(id);
                    Item::Placeholder(id)
                }
            })
            .collect();
        missing
    }

    /// Merge one resolved item into the window in place. Idempotent, and a
    /// resolved slot never reverts to a placeholder.
    pub(crate) fn merge(&mut self, id: ItemId, item: &Item) {
        if item.is_placeholder() {
            return;
        }
        for slot in &mut self.items {
            if slot.id() == id && slot.is_placeholder() {
                *slot = item.clone();
            }
        }
        // A late success supersedes an earlier failure marker.
        self.failed.remove(&id);
    }

    /// Record a per-id fetch failure for the current window. The slot keeps
    /// its placeholder; presentation renders the marker over it.
    pub(crate) fn record_failure(&mut self, id: ItemId, message: String) {
        if self.window().contains(&id) {
            self.failed.insert(id, message);
        }
    }

    /// Id slice for the current page window.
    pub fn window(&self) -> &[ItemId] {
        let start = (self.page * self.page_size).min(self.ids.len());
        let end = (start + self.page_size).min(self.ids.len());
        &self.ids[start..end]
    }

    /// Materialized items for the current page, positionally matching
    /// `window()`.
    pub fn current_items(&self) -> &[Item] {
        &self.items
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.ids.len().div_ceil(self.page_size)
    }

    pub fn total_ids(&self) -> usize {
        self.ids.len()
    }

    /// Per-id failure messages for the current window.
    pub fn failed(&self) -> &HashMap<ItemId, String> {
        &self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Story;
    use chrono::DateTime;

    fn story(id: ItemId) -> Item {
        Item::Story(Story {
            id,
            by: "pg".to_string(),
            score: 10,
            title: format!("story {id}"),
            url: None,
            descendants: 0,
            kids: Vec::new(),
            time: DateTime::from_timestamp(1_200_000_000, 0).unwrap(),
            dead: false,
        })
    }

    fn ninety_five() -> PageState {
        let mut page = PageState::new(30);
        page.set_ids((1..=95).collect());
        page
    }

    #[test]
    fn first_page_window() {
        let mut page = ninety_five();
        let cache = ItemCache::new();

        let missing = page.set_page(0, &cache);
        let expected: Vec<ItemId> = (1..=30).collect();
        assert_eq!(page.window(), expected.as_slice());
        assert_eq!(missing, expected);
        assert_eq!(page.page_count(), 4);
    }

    #[test]
    fn last_page_is_short() {
        let mut page = ninety_five();
        let cache = ItemCache::new();

        page.set_page(3, &cache);
        let expected: Vec<ItemId> = (91..=95).collect();
        assert_eq!(page.window(), expected.as_slice());
        assert_eq!(page.current_items().len(), 5);
    }

    #[test]
    fn every_page_covers_its_slice() {
        let mut page = ninety_five();
        let cache = ItemCache::new();
        let all_ids: Vec<ItemId> = (1..=95).collect();

        for n in 0..page.page_count() {
            page.set_page(n, &cache);
            let expected_len = 30.min(all_ids.len() - n * 30);
            assert_eq!(page.current_items().len(), expected_len);
            for (i, item) in page.current_items().iter().enumerate() {
                assert_eq!(item.id(), all_ids[n * 30 + i]);
            }
        }
    }

    #[test]
    fn overflow_page_clamps_to_last() {
        let mut page = ninety_five();
        let cache = ItemCache::new();

        page.set_page(99, &cache);
        assert_eq!(page.page(), 3);
    }

    #[test]
    fn empty_id_list() {
        let mut page = PageState::new(30);
        let cache = ItemCache::new();

        assert_eq!(page.page_count(), 0);
        let missing = page.set_page(5, &cache);
        assert_eq!(page.page(), 0);
        assert!(missing.is_empty());
        assert!(page.current_items().is_empty());
    }

    #[test]
    fn cached_items_fill_the_window() {
        let mut page = PageState::new(2);
        page.set_ids(vec![1, 2, 3]);
        let mut cache = ItemCache::new();
        cache.put(1, story(1));

        let missing = page.set_page(0, &cache);
        assert_eq!(missing, vec![2]);
        assert_eq!(page.current_items()[0], story(1));
        assert_eq!(page.current_items()[1], Item::Placeholder(2));
    }

    #[test]
    fn merge_is_idempotent_and_monotonic() {
        let mut page = PageState::new(2);
        page.set_ids(vec![1, 2]);
        page.set_page(0, &ItemCache::new());

        page.merge(1, &story(1));
        let after_first: Vec<Item> = page.current_items().to_vec();
        page.merge(1, &story(1));
        assert_eq!(page.current_items(), after_first.as_slice());

        // A stale placeholder never overwrites the resolved slot.
        page.merge(1, &Item::Placeholder(1));
        assert_eq!(page.current_items()[0], story(1));
    }

    #[test]
    fn failure_marker_is_cleared_by_late_success() {
        let mut page = PageState::new(2);
        page.set_ids(vec![1, 2]);
        page.set_page(0, &ItemCache::new());

        page.record_failure(1, "Timeout".to_string());
        assert_eq!(page.failed().get(&1).map(String::as_str), Some("Timeout"));
        assert_eq!(page.current_items()[0], Item::Placeholder(1));

        page.merge(1, &story(1));
        assert!(page.failed().is_empty());
    }

    #[test]
    fn failure_outside_window_is_ignored() {
        let mut page = PageState::new(2);
        page.set_ids(vec![1, 2, 3]);
        page.set_page(0, &ItemCache::new());

        page.record_failure(3, "Timeout".to_string());
        assert!(page.failed().is_empty());
    }
}
