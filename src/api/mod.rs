// Hacker News API module.
// Client, typed endpoints, and wire/domain item types.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{DEFAULT_BASE_URL, HnClient};
pub use endpoints::Feed;
pub use types::{Comment, Item, ItemId, Job, Story};
