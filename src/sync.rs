pub mod reader;
pub mod sync_feed_job;

pub use reader::{FetchedFeed, FetchedFeedItem};
pub use sync_feed_job::{FetchMode, SyncFeedJob};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("invalid source configuration: {msg}")]
    Config { msg: String },
    #[error("failed to fetch the feed: {msg}")]
    Fetch { msg: String },
    #[error("failed to parse the feed: {msg}")]
    Parse { msg: String },
    #[error("`{value}` doesn't match the timestamp format `{format}`")]
    DateParse { value: String, format: String },
    #[error("failed to store feed entries: {msg}")]
    Db { msg: String },
    #[error("unknown fetch mode `{mode}`, only \"json\" and \"rss\" are recognized")]
    UnknownMode { mode: String },
}

impl From<diesel::result::Error> for SyncError {
    fn from(error: diesel::result::Error) -> Self {
        let msg = format!("{error:?}");

        SyncError::Db { msg }
    }
}

impl SyncError {
    /// Configuration and fetch failures leave the store untouched and are
    /// reported as an empty run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SyncError::Config { .. } | SyncError::Fetch { .. })
    }
}
