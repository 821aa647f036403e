// Hacker News item types.
// Wire format for /item/{id}.json and the decoded domain representation.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::FetchError;

/// Item identifier. Assigned upstream, monotonically increasing, unique,
/// and immutable once observed.
pub type ItemId = u64;

/// A fetched item, or a stand-in for one whose fetch has not resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Placeholder(ItemId),
    Story(Story),
    Comment(Comment),
    Job(Job),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Item::Placeholder(id) => *id,
            Item::Story(story) => story.id,
            Item::Comment(comment) => comment.id,
            Item::Job(job) => job.id,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Item::Placeholder(_))
    }

    /// Child ids, empty for variants that cannot have children.
    pub fn kids(&self) -> &[ItemId] {
        match self {
            Item::Story(story) => &story.kids,
            Item::Comment(comment) => &comment.kids,
            Item::Placeholder(_) | Item::Job(_) => &[],
        }
    }
}

/// A submitted story.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub id: ItemId,
    pub by: String,
    pub score: i64,
    pub title: String,
    pub url: Option<String>,
    pub descendants: u64,
    pub kids: Vec<ItemId>,
    pub time: DateTime<Utc>,
    /// Moderated out; kept in listings since the feed ranked it.
    pub dead: bool,
}

/// A comment under a story or another comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: ItemId,
    pub by: String,
    pub text: String,
    pub parent: ItemId,
    pub kids: Vec<ItemId>,
    pub time: DateTime<Utc>,
    /// Deleted or moderated; pruned from comment trees.
    pub deleted: bool,
}

/// A job posting; never has children.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: ItemId,
    pub by: String,
    pub score: i64,
    pub title: String,
    pub url: Option<String>,
    pub time: DateTime<Utc>,
}

/// Raw wire shape of an item document. Almost every field is optional on
/// the wire (deleted items keep only `id` and flags); decoding into `Item`
/// validates the per-type requirements.
#[derive(Debug, Deserialize)]
pub(crate) struct RawItem {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub by: Option<String>,
    pub score: Option<i64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub descendants: Option<u64>,
    #[serde(default)]
    pub kids: Vec<ItemId>,
    pub time: Option<i64>,
    pub text: Option<String>,
    pub parent: Option<ItemId>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
}

impl TryFrom<RawItem> for Item {
    type Error = FetchError;

    fn try_from(raw: RawItem) -> Result<Self, FetchError> {
        let time = epoch_to_utc(raw.time.unwrap_or(0));
        let kind = raw
            .kind
            .as_deref()
            .ok_or_else(|| FetchError::BadBody(format!("item {} has no type", raw.id)))?;

        match kind {
            "story" => Ok(Item::Story(Story {
                id: raw.id,
                by: raw.by.unwrap_or_default(),
                score: raw.score.unwrap_or(0),
                title: raw.title.unwrap_or_default(),
                url: raw.url,
                descendants: raw.descendants.unwrap_or(0),
                kids: raw.kids,
                time,
                dead: raw.dead,
            })),
            "comment" => Ok(Item::Comment(Comment {
                id: raw.id,
                by: raw.by.unwrap_or_default(),
                text: raw.text.unwrap_or_default(),
                parent: raw.parent.unwrap_or(0),
                kids: raw.kids,
                time,
                deleted: raw.deleted || raw.dead,
            })),
            "job" => Ok(Item::Job(Job {
                id: raw.id,
                by: raw.by.unwrap_or_default(),
                score: raw.score.unwrap_or(0),
                title: raw.title.unwrap_or_default(),
                url: raw.url,
                time,
            })),
            other => Err(FetchError::BadBody(format!(
                "unknown item type {:?} for item {}",
                other, raw.id
            ))),
        }
    }
}

/// The API reports epoch seconds with no sub-second precision.
fn epoch_to_utc(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
