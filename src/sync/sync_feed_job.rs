use crate::config::Config;
use crate::db;
use crate::db::feed_entries;
use crate::db::feed_entries::NewFeedEntry;
use crate::http_client;
use crate::normalizer;
use crate::sync::reader::json::JsonReader;
use crate::sync::reader::rss::RssReader;
use crate::sync::reader::ReadFeed;
use crate::sync::{FetchedFeed, FetchedFeedItem, SyncError};
use chrono::{DateTime, NaiveDateTime};
use diesel::connection::Connection;
use diesel::sqlite::SqliteConnection;
use log::error;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Json,
    Rss,
}

impl FromStr for FetchMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(FetchMode::Json),
            "rss" => Ok(FetchMode::Rss),
            _ => Err(SyncError::UnknownMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Json => write!(f, "json"),
            FetchMode::Rss => write!(f, "rss"),
        }
    }
}

pub struct SyncFeedJob<'a> {
    mode: FetchMode,
    config: &'a Config,
}

impl<'a> SyncFeedJob<'a> {
    pub fn new(mode: FetchMode, config: &'a Config) -> Self {
        Self { mode, config }
    }

    /// Runs the job and reports every failure through the log.
    /// Returns the number of inserted entries.
    pub fn sync_feed(&self, db_connection: &mut SqliteConnection) -> usize {
        match self.execute(db_connection) {
            Ok(count) => count,
            Err(error) if error.is_fatal() => {
                error!("Failed to process {} feed: {}", self.mode, error);
                0
            }
            Err(error) => {
                error!("Skipped {} feed: {}", self.mode, error);
                0
            }
        }
    }

    pub fn execute(&self, db_connection: &mut SqliteConnection) -> Result<usize, SyncError> {
        log::info!("Started processing {} feed", self.mode);

        let fetched_feed = self.read_feed()?;
        let count = self.create_feed_entries(db_connection, fetched_feed)?;

        log::info!(
            "Successfully processed {} feed. Inserted entries: {}",
            self.mode,
            count
        );

        Ok(count)
    }

    /// Stores unseen items oldest first, all in one transaction.
    ///
    /// Items are taken in reverse source order and then ordered by publication
    /// time; the sort is stable so equal timestamps keep the reversed order.
    pub fn create_feed_entries(
        &self,
        db_connection: &mut SqliteConnection,
        fetched_feed: FetchedFeed,
    ) -> Result<usize, SyncError> {
        db_connection.transaction::<usize, SyncError, _>(|connection| {
            let mut new_items = vec![];

            for item in fetched_feed.items.into_iter().rev() {
                if feed_entries::exists(connection, &item.source_id)? {
                    continue;
                }

                let title = match entry_title(&item) {
                    Some(title) => title,
                    None => {
                        error!("Skipping entry {}: no title and no link", item.source_id);
                        continue;
                    }
                };

                match parse_published_at(item.published_at.as_deref(), self.published_at_format()) {
                    Ok(published_at) => new_items.push((item, title, published_at)),
                    Err(err) => error!("Skipping entry {}: {}", item.source_id, err),
                }
            }

            new_items.sort_by_key(|(_, _, published_at)| *published_at);

            let mut count = 0;

            for (item, title, published_at) in new_items {
                count += self.create_feed_entry(connection, &item, &title, published_at)?;
            }

            Ok(count)
        })
    }

    fn create_feed_entry(
        &self,
        connection: &mut SqliteConnection,
        item: &FetchedFeedItem,
        title: &str,
        published_at: NaiveDateTime,
    ) -> Result<usize, SyncError> {
        let new_entry = NewFeedEntry {
            source_id: &item.source_id,
            title,
            link: &item.link,
            published_at,
            description: &item.description,
        };

        Ok(feed_entries::create(connection, &new_entry)?)
    }

    fn read_feed(&self) -> Result<FetchedFeed, SyncError> {
        let client = http_client::client(self.config).map_err(|err| SyncError::Fetch {
            msg: format!("{err:?}"),
        })?;

        match self.mode {
            FetchMode::Rss => RssReader {
                url: self.config.rss_feed_url.clone(),
            }
            .read(&client),

            FetchMode::Json => JsonReader {
                url: self.config.json_feed_url.clone(),
            }
            .read(&client),
        }
    }

    fn published_at_format(&self) -> &str {
        match self.mode {
            FetchMode::Rss => &self.config.rss_published_at_format,
            FetchMode::Json => &self.config.json_published_at_format,
        }
    }
}

/// The normalized title, or the normalized link for untitled items. `None`
/// when both are blank.
fn entry_title(item: &FetchedFeedItem) -> Option<String> {
    [&item.title, &item.link]
        .into_iter()
        .map(|text| normalizer::normalize(text))
        .find(|text| !text.trim().is_empty())
}

/// Missing values fall back to the current time. Values carrying a UTC
/// offset are converted to UTC, values without one are taken as UTC.
pub fn parse_published_at(value: Option<&str>, format: &str) -> Result<NaiveDateTime, SyncError> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(db::current_time()),
        Some(value) => value,
    };

    DateTime::parse_from_str(value, format)
        .map(|date| date.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(value, format))
        .map_err(|_| SyncError::DateParse {
            value: value.to_string(),
            format: format.to_string(),
        })
}
