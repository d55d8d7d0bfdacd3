use crate::sync::reader::{FetchedFeed, FetchedFeedItem, ReadFeed};
use crate::sync::SyncError;
use rss::{Channel, Item};

pub struct RssReader {
    pub url: String,
}

impl ReadFeed for RssReader {
    fn read_from_bytes(&self, data: &[u8]) -> Result<FetchedFeed, SyncError> {
        match Channel::read_from(data) {
            Ok(channel) => Ok(FetchedFeed::from(channel)),
            Err(err) => {
                let msg = format!("{err}");
                Err(SyncError::Parse { msg })
            }
        }
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}

impl From<Channel> for FetchedFeed {
    fn from(channel: Channel) -> Self {
        let items = channel
            .items()
            .iter()
            .filter_map(fetched_item)
            .collect::<Vec<FetchedFeedItem>>();

        FetchedFeed { items }
    }
}

fn fetched_item(item: &Item) -> Option<FetchedFeedItem> {
    let link = match item.link() {
        Some(link) => link.to_string(),
        None => {
            log::warn!("Skipping RSS item without a link: {:?}", item.title());
            return None;
        }
    };

    let source_id = item
        .guid()
        .map(|guid| guid.value().to_string())
        .filter(|guid| !guid.trim().is_empty())
        .unwrap_or_else(|| link.clone());

    Some(FetchedFeedItem {
        source_id,
        title: item.title().unwrap_or_default().to_string(),
        link,
        published_at: item.pub_date().map(|date| date.to_string()),
        description: item.description().unwrap_or_default().to_string(),
    })
}
