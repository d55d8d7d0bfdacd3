pub mod change;
pub mod feed_entry;
pub mod feed_entry_tag;
pub mod tag;

pub use change::Change;
pub use feed_entry::{FeedEntry, FeedEntryWithTags};
pub use feed_entry_tag::FeedEntryTag;
pub use tag::Tag;
