// hearth: data and fetch core for a Hacker News reader.
// Maintains the paginated story listing and the expandable comment tree
// consumed by a presentation layer; the rendering itself lives elsewhere.

pub mod api;
pub mod error;
pub mod session;

pub use api::{Comment, Feed, HnClient, Item, ItemId, Job, Story};
pub use error::{FetchError, Result};
pub use session::{CommentTree, ItemCache, PageState, Session, SessionConfig};
