// Typed endpoint methods for the Hacker News API.
// Id-list feeds, single-item fetch with decode, and deduplicated batch
// fan-out.

use std::collections::HashSet;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

use super::client::HnClient;
use super::types::{Item, ItemId, RawItem};

/// Story feed selector; each maps to one id-list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feed {
    #[default]
    Top,
    New,
    Best,
    Ask,
    Show,
    Jobs,
}

impl Feed {
    pub fn path(&self) -> &'static str {
        match self {
            Feed::Top => "/topstories.json",
            Feed::New => "/newstories.json",
            Feed::Best => "/beststories.json",
            Feed::Ask => "/askstories.json",
            Feed::Show => "/showstories.json",
            Feed::Jobs => "/jobstories.json",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Feed::Top => "Top",
            Feed::New => "New",
            Feed::Best => "Best",
            Feed::Ask => "Ask",
            Feed::Show => "Show",
            Feed::Jobs => "Jobs",
        }
    }
}

impl HnClient {
    /// Fetch the ordered id list for a feed.
    pub async fn feed_ids(&self, feed: Feed) -> Result<Vec<ItemId>> {
        self.get_json(feed.path()).await
    }

    /// Fetch and decode a single item.
    pub async fn item(&self, id: ItemId) -> Result<Item> {
        let raw: Option<RawItem> = self.get_json(&format!("/item/{}.json", id)).await?;
        decode_item(id, raw)
    }

    /// Fetch a batch of items concurrently. Ids are deduplicated within the
    /// batch, each result is matched back to its requesting id, and one
    /// failure never aborts the rest. Completion order is unspecified.
    pub async fn fetch_many(&self, ids: &[ItemId]) -> Vec<(ItemId, Result<Item>)> {
        let mut seen = HashSet::new();
        let mut tasks = JoinSet::new();
        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            let client = self.clone();
            tasks.spawn(async move { (id, client.item(id).await) });
        }
        debug!(requested = ids.len(), unique = seen.len(), "dispatching item batch");

        let mut results = Vec::with_capacity(seen.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(pair) => results.push(pair),
                Err(err) => warn!(error = %err, "item fetch task aborted"),
            }
        }
        results
    }
}

/// Validate and decode an item response body. The endpoint answers `null`
/// for ids it has no record of, and a body whose id differs from the
/// requested one fails rather than merging under the wrong key (the node
/// would otherwise stay pending and be re-fetched forever).
fn decode_item(id: ItemId, raw: Option<RawItem>) -> Result<Item> {
    let raw = raw.ok_or_else(|| FetchError::BadBody(format!("no item for id {}", id)))?;
    if raw.id != id {
        return Err(FetchError::BadBody(format!(
            "item {} in response for requested id {}",
            raw.id, id
        )));
    }
    Item::try_from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_paths_are_distinct() {
        let feeds = [Feed::Top, Feed::New, Feed::Best, Feed::Ask, Feed::Show, Feed::Jobs];
        let paths: HashSet<_> = feeds.iter().map(|f| f.path()).collect();
        assert_eq!(paths.len(), feeds.len());
        assert_eq!(Feed::default().path(), "/topstories.json");
    }

    #[test]
    fn null_body_fails_decode() {
        let err = decode_item(8, None).unwrap_err();
        assert!(err.to_string().contains("no item for id 8"));
    }

    #[test]
    fn mismatched_response_id_fails_decode() {
        let raw: RawItem = serde_json::from_value(serde_json::json!({
            "id": 7,
            "type": "job",
            "by": "justin",
            "title": "posting",
            "time": 1_210_981_217
        }))
        .unwrap();

        let err = decode_item(8, Some(raw)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("item 7"), "{message}");
        assert!(message.contains("requested id 8"), "{message}");
    }

    #[test]
    fn matching_response_id_decodes() {
        let raw: RawItem = serde_json::from_value(serde_json::json!({
            "id": 8,
            "type": "job",
            "by": "justin",
            "title": "posting",
            "time": 1_210_981_217
        }))
        .unwrap();

        let item = decode_item(8, Some(raw)).unwrap();
        assert_eq!(item.id(), 8);
    }
}
