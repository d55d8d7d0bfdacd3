use super::Tag;
use crate::schema::feed_entries;
use chrono::NaiveDateTime;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Eq, PartialEq)]
#[diesel(table_name = feed_entries)]
pub struct FeedEntry {
    pub id: i32,
    pub source_id: String,
    pub title: String,
    pub link: String,
    pub published_at: NaiveDateTime,
    pub description: String,
}

/// An entry together with its resolved tag set, ordered by tag id.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedEntryWithTags {
    pub entry: FeedEntry,
    pub tags: Vec<Tag>,
}

impl FeedEntryWithTags {
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|tag| tag.name.clone()).collect()
    }
}
