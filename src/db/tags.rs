use crate::models::{FeedEntryTag, Tag};
use crate::schema::{feed_entry_tags, tags};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::sqlite::SqliteConnection;

#[derive(Insertable)]
#[diesel(table_name = tags)]
struct NewTag<'a> {
    name: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = feed_entry_tags)]
struct NewFeedEntryTag {
    feed_entry_id: i32,
    tag_id: i32,
}

/// Tag names are matched and stored trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn find(conn: &mut SqliteConnection, id: i32) -> Result<Option<Tag>, Error> {
    tags::table
        .filter(tags::id.eq(id))
        .select(Tag::as_select())
        .first(conn)
        .optional()
}

pub fn find_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<Tag>, Error> {
    tags::table
        .filter(tags::name.eq(normalize_name(name)))
        .select(Tag::as_select())
        .first(conn)
        .optional()
}

pub fn find_or_create(conn: &mut SqliteConnection, name: &str) -> Result<Tag, Error> {
    let name = normalize_name(name);

    diesel::insert_into(tags::table)
        .values(NewTag { name: &name })
        .on_conflict(tags::name)
        .do_nothing()
        .execute(conn)?;

    tags::table
        .filter(tags::name.eq(&name))
        .select(Tag::as_select())
        .first(conn)
}

/// Number of stored tags, orphans included.
pub fn count(conn: &mut SqliteConnection) -> Result<i64, Error> {
    tags::table.count().get_result(conn)
}

pub fn find_link(
    conn: &mut SqliteConnection,
    feed_entry_id: i32,
    tag_id: i32,
) -> Result<Option<FeedEntryTag>, Error> {
    feed_entry_tags::table
        .filter(feed_entry_tags::feed_entry_id.eq(feed_entry_id))
        .filter(feed_entry_tags::tag_id.eq(tag_id))
        .select(FeedEntryTag::as_select())
        .first(conn)
        .optional()
}

pub fn create_link(
    conn: &mut SqliteConnection,
    feed_entry_id: i32,
    tag_id: i32,
) -> Result<FeedEntryTag, Error> {
    diesel::insert_into(feed_entry_tags::table)
        .values(NewFeedEntryTag {
            feed_entry_id,
            tag_id,
        })
        .returning(FeedEntryTag::as_returning())
        .get_result(conn)
}

pub fn remove_link(
    conn: &mut SqliteConnection,
    feed_entry_id: i32,
    tag_id: i32,
) -> Result<usize, Error> {
    let record_query = feed_entry_tags::table
        .filter(feed_entry_tags::feed_entry_id.eq(feed_entry_id))
        .filter(feed_entry_tags::tag_id.eq(tag_id));

    diesel::delete(record_query).execute(conn)
}

pub fn count_links_for_entry(conn: &mut SqliteConnection, feed_entry_id: i32) -> Result<i64, Error> {
    feed_entry_tags::table
        .filter(feed_entry_tags::feed_entry_id.eq(feed_entry_id))
        .count()
        .get_result(conn)
}
