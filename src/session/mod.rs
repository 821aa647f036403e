// Session state management.
// One explicit session object owns the client, cache, page state, and
// comment tree. Every fetch result merges through here on a single task,
// which keeps cache writes serialized without locking.

pub mod cache;
pub mod pager;
pub mod tree;

pub use cache::ItemCache;
pub use pager::{DEFAULT_PAGE_SIZE, PageState};
pub use tree::{CommentTree, Node, NodeSlot};

use tracing::{debug, warn};

use crate::api::{DEFAULT_BASE_URL, Feed, HnClient, Item, ItemId};
use crate::error::Result;

/// Session construction parameters.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// API base URL; override for tests or mirrors.
    pub base_url: String,
    /// Stories per listing page.
    pub page_size: usize,
    /// Feed selected at startup.
    pub feed: Feed,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            feed: Feed::default(),
        }
    }
}

/// One reader session: created at startup, torn down on exit. All state
/// lives here and is passed by handle to the presentation layer; there are
/// no ambient globals.
pub struct Session {
    client: HnClient,
    cache: ItemCache,
    page: PageState,
    feed: Feed,
    tree: Option<CommentTree>,
    /// Session-wide error from the last id-list fetch, if it failed.
    last_error: Option<String>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        Ok(Self {
            client: HnClient::with_base_url(&config.base_url)?,
            cache: ItemCache::new(),
            page: PageState::new(config.page_size),
            feed: config.feed,
            tree: None,
            last_error: None,
        })
    }

    /// Load a feed's id list and materialize its first page. On failure the
    /// previous listing stays as it was and `last_error` is set.
    pub async fn load_feed(&mut self, feed: Feed) {
        self.feed = feed;
        match self.client.feed_ids(feed).await {
            Ok(ids) => {
                debug!(feed = feed.title(), count = ids.len(), "feed ids loaded");
                self.last_error = None;
                self.page.set_ids(ids);
                self.set_page(0).await;
            }
            Err(err) => {
                warn!(feed = feed.title(), error = %err, "feed load failed");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Show page `n` (clamped to the valid range), fetching exactly the
    /// window's missing items.
    pub async fn set_page(&mut self, n: usize) {
        let missing = self.page.set_page(n, &self.cache);
        if missing.is_empty() {
            return;
        }
        for (id, result) in self.client.fetch_many(&missing).await {
            self.apply_page_fetch(id, result);
        }
    }

    /// Merge one page-window fetch result. Idempotent per id.
    fn apply_page_fetch(&mut self, id: ItemId, result: Result<Item>) {
        match result {
            Ok(item) => {
                self.cache.put(id, item.clone());
                self.page.merge(id, &item);
            }
            Err(err) => {
                // Failed ids stay out of the cache, so revisiting the page
                // silently retries them.
                warn!(id, error = %err, "item fetch failed");
                self.page.record_failure(id, err.to_string());
            }
        }
    }

    /// Expand the comment tree under `root_id`, fetching layer after layer
    /// until no pending node remains. Re-expanding the same root updates
    /// the existing tree in place; a different root replaces it.
    pub async fn expand(&mut self, root_id: ItemId) {
        let mut tree = match self.tree.take() {
            Some(mut tree) if tree.root_id() == root_id => {
                // A re-triggered expansion retries error leaves; their ids
                // were never cached.
                tree.retry_failed();
                tree
            }
            _ => CommentTree::new(root_id),
        };

        loop {
            self.drain_cached(&mut tree);
            let missing = tree.pending_ids();
            if missing.is_empty() {
                break;
            }
            debug!(root = root_id, count = missing.len(), "fetching comment layer");
            for (id, result) in self.client.fetch_many(&missing).await {
                match result {
                    Ok(item) => {
                        self.cache.put(id, item.clone());
                        tree.merge(&item);
                    }
                    Err(err) => tree.fail(id, err.to_string()),
                }
            }
        }

        self.tree = Some(tree);
    }

    /// Resolve pending nodes from the cache until no more progress can be
    /// made; each merge may reveal further cached layers.
    fn drain_cached(&self, tree: &mut CommentTree) {
        loop {
            let hits: Vec<Item> = tree
                .pending_ids()
                .into_iter()
                .filter_map(|id| self.cache.get(id))
                .filter(|item| !item.is_placeholder())
                .cloned()
                .collect();
            if hits.is_empty() {
                return;
            }
            for item in &hits {
                tree.merge(item);
            }
        }
    }

    pub fn feed(&self) -> Feed {
        self.feed
    }

    /// Materialized items for the current page.
    pub fn current_items(&self) -> &[Item] {
        self.page.current_items()
    }

    pub fn page_count(&self) -> usize {
        self.page.page_count()
    }

    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    /// The comment tree from the last `expand` call, if any.
    pub fn comment_tree(&self) -> Option<&CommentTree> {
        self.tree.as_ref()
    }

    pub fn cache(&self) -> &ItemCache {
        &self.cache
    }

    /// Session-wide error message from the last failed feed load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
