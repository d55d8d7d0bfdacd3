use super::{EntryExtension, RenderError};
use crate::models::FeedEntryWithTags;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize, Debug)]
pub struct JsonFeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl From<&FeedEntryWithTags> for JsonFeedItem {
    fn from(item: &FeedEntryWithTags) -> Self {
        Self {
            title: item.entry.title.clone(),
            link: item.entry.link.clone(),
            description: item.entry.description.clone(),
            tags: item.tag_names(),
        }
    }
}

/// Adds the entry's publication time, RFC 3339 formatted.
pub struct PublishedAt;

impl EntryExtension for PublishedAt {
    fn extra_fields(&self, item: &FeedEntryWithTags) -> Map<String, Value> {
        let mut fields = Map::new();

        fields.insert(
            "published_at".to_string(),
            Value::String(super::atom::rfc_3339_date(&item.entry.published_at)),
        );

        fields
    }
}

pub fn to_values<'a>(
    extension: &dyn EntryExtension,
    entries: impl Iterator<Item = &'a FeedEntryWithTags>,
) -> Result<Vec<Value>, RenderError> {
    entries
        .map(|item| {
            let mut object = match serde_json::to_value(JsonFeedItem::from(item)) {
                Ok(Value::Object(object)) => object,
                Ok(other) => {
                    return Err(RenderError {
                        msg: format!("unexpected JSON value {other}"),
                    })
                }
                Err(err) => return Err(RenderError { msg: format!("{err}") }),
            };

            for (key, value) in extension.extra_fields(item) {
                object.entry(key).or_insert(value);
            }

            Ok(Value::Object(object))
        })
        .collect()
}

pub fn render<'a>(
    extension: &dyn EntryExtension,
    entries: impl Iterator<Item = &'a FeedEntryWithTags>,
) -> Result<String, RenderError> {
    let values = to_values(extension, entries)?;

    serde_json::to_string(&values).map_err(|err| RenderError {
        msg: format!("{err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::PublishedAt;
    use crate::models::FeedEntryWithTags;
    use crate::render::tests::entry;
    use crate::render::{EntryExtension, NoExtension};
    use serde_json::{json, Map, Value};

    struct Overriding;

    impl EntryExtension for Overriding {
        fn extra_fields(&self, _item: &FeedEntryWithTags) -> Map<String, Value> {
            let mut fields = Map::new();
            fields.insert("title".to_string(), json!("replaced"));
            fields.insert("source".to_string(), json!("custom"));
            fields
        }
    }

    #[test]
    fn it_renders_entry_objects() {
        let entries = vec![entry(2, &["news"]), entry(1, &[])];

        let body = super::render(&NoExtension, entries.iter().rev()).unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();

        assert_eq!(
            value,
            json!([
                {
                    "title": "Entry 1",
                    "link": "http://example.com/1",
                    "description": "<p>Body 1</p>",
                    "tags": []
                },
                {
                    "title": "Entry 2",
                    "link": "http://example.com/2",
                    "description": "<p>Body 2</p>",
                    "tags": ["news"]
                }
            ])
        );
    }

    #[test]
    fn it_adds_extension_fields() {
        let entries = vec![entry(1, &[])];

        let values = super::to_values(&PublishedAt, entries.iter()).unwrap();

        assert_eq!(values[0]["published_at"], json!("2024-01-01T00:00:00Z"));
        assert_eq!(values[0]["title"], json!("Entry 1"));
    }

    #[test]
    fn extension_fields_do_not_replace_built_in_fields() {
        let entries = vec![entry(1, &[])];

        let values = super::to_values(&Overriding, entries.iter()).unwrap();

        assert_eq!(values[0]["title"], json!("Entry 1"));
        assert_eq!(values[0]["source"], json!("custom"));
    }
}
