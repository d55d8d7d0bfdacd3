use crate::sync::reader::{FetchedFeed, FetchedFeedItem, ReadFeed};
use crate::sync::SyncError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub struct JsonReader {
    pub url: String,
}

#[derive(Deserialize, Debug)]
struct JsonFeed {
    data: Vec<JsonFeedItem>,
}

#[derive(Deserialize, Debug)]
struct JsonFeedItem {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    date_utc: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ReadFeed for JsonReader {
    fn read_from_bytes(&self, data: &[u8]) -> Result<FetchedFeed, SyncError> {
        match serde_json::from_slice::<JsonFeed>(data) {
            Ok(feed) => Ok(FetchedFeed::from(feed)),
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

impl From<JsonFeed> for FetchedFeed {
    fn from(feed: JsonFeed) -> Self {
        let items = feed
            .data
            .into_iter()
            .map(|item| FetchedFeedItem {
                source_id: item.id,
                title: item.title,
                link: item.url,
                published_at: item.date_utc,
                description: item.description.unwrap_or_default(),
            })
            .collect::<Vec<FetchedFeedItem>>();

        FetchedFeed { items }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or a number as id, got {other}"
        ))),
    }
}
