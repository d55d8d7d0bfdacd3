use super::{FeedEntry, Tag};
use crate::schema::feed_entry_tags;

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, Eq, PartialEq)]
#[diesel(belongs_to(FeedEntry))]
#[diesel(belongs_to(Tag))]
#[diesel(table_name = feed_entry_tags)]
pub struct FeedEntryTag {
    pub id: i32,
    pub feed_entry_id: i32,
    pub tag_id: i32,
}
