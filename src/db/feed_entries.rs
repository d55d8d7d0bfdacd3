use crate::db::tags;
use crate::models::{FeedEntry, FeedEntryTag, FeedEntryWithTags, Tag};
use crate::schema::{feed_entries, feed_entry_tags};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error;
use diesel::sqlite::SqliteConnection;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = feed_entries)]
pub struct NewFeedEntry<'a> {
    pub source_id: &'a str,
    pub title: &'a str,
    pub link: &'a str,
    pub published_at: NaiveDateTime,
    pub description: &'a str,
}

/// Returns the number of inserted rows: 0 when `source_id` is already stored.
pub fn create(conn: &mut SqliteConnection, new_entry: &NewFeedEntry) -> Result<usize, Error> {
    diesel::insert_into(feed_entries::table)
        .values(new_entry)
        .on_conflict(feed_entries::source_id)
        .do_nothing()
        .execute(conn)
}

pub fn find(conn: &mut SqliteConnection, id: i32) -> Result<Option<FeedEntry>, Error> {
    feed_entries::table
        .filter(feed_entries::id.eq(id))
        .select(FeedEntry::as_select())
        .first(conn)
        .optional()
}

/// Looks an entry up by its dedup key.
pub fn find_by_source_id(
    conn: &mut SqliteConnection,
    source_id: &str,
) -> Result<Option<FeedEntry>, Error> {
    feed_entries::table
        .filter(feed_entries::source_id.eq(source_id))
        .select(FeedEntry::as_select())
        .first(conn)
        .optional()
}

pub fn exists(conn: &mut SqliteConnection, source_id: &str) -> Result<bool, Error> {
    diesel::select(diesel::dsl::exists(
        feed_entries::table.filter(feed_entries::source_id.eq(source_id)),
    ))
    .get_result(conn)
}

/// Number of stored entries.
pub fn count(conn: &mut SqliteConnection) -> Result<i64, Error> {
    feed_entries::table.count().get_result(conn)
}

/// All entries, or the entries linked to `tag_name`, newest identity first.
///
/// An unknown tag yields an empty result. `limit` is applied after ordering.
pub fn find_entries(
    conn: &mut SqliteConnection,
    tag_name: Option<&str>,
    limit: Option<i64>,
) -> Result<Vec<FeedEntryWithTags>, Error> {
    let mut query = feed_entries::table
        .select(FeedEntry::as_select())
        .order(feed_entries::id.desc())
        .into_boxed();

    if let Some(name) = tag_name {
        let tag = match tags::find_by_name(conn, name)? {
            Some(tag) => tag,
            None => {
                log::warn!("Tag not found: {}", name);

                return Ok(vec![]);
            }
        };

        let tagged_entry_ids = feed_entry_tags::table
            .filter(feed_entry_tags::tag_id.eq(tag.id))
            .select(feed_entry_tags::feed_entry_id);

        query = query.filter(feed_entries::id.eq_any(tagged_entry_ids));
    }

    if let Some(limit) = limit.filter(|limit| *limit > 0) {
        query = query.limit(limit);
    }

    let entries = query.load::<FeedEntry>(conn)?;

    with_tags(conn, entries)
}

pub fn with_tags(
    conn: &mut SqliteConnection,
    entries: Vec<FeedEntry>,
) -> Result<Vec<FeedEntryWithTags>, Error> {
    use crate::schema::tags as tags_table;

    let links = FeedEntryTag::belonging_to(&entries)
        .inner_join(tags_table::table)
        .select((FeedEntryTag::as_select(), Tag::as_select()))
        .order(tags_table::id)
        .load::<(FeedEntryTag, Tag)>(conn)?;

    let grouped_links = links.grouped_by(&entries);

    let result = entries
        .into_iter()
        .zip(grouped_links)
        .map(|(entry, links)| FeedEntryWithTags {
            entry,
            tags: links.into_iter().map(|(_link, tag)| tag).collect(),
        })
        .collect();

    Ok(result)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::NewFeedEntry;
    use crate::db;
    use crate::db::tags;
    use crate::models::FeedEntry;
    use chrono::NaiveDate;
    use diesel::connection::Connection;
    use diesel::result::Error;
    use diesel::sqlite::SqliteConnection;
    use diesel::RunQueryDsl;

    pub fn insert_entry(connection: &mut SqliteConnection, source_id: &str) -> FeedEntry {
        let published_at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let title = format!("Title {source_id}");
        let link = format!("http://example.com/{source_id}");

        let new_entry = NewFeedEntry {
            source_id,
            title: &title,
            link: &link,
            published_at,
            description: "Description",
        };

        super::create(connection, &new_entry).unwrap();

        super::find_by_source_id(connection, source_id).unwrap().unwrap()
    }

    #[test]
    fn create_creates_new_feed_entry() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let entry = insert_entry(connection, "x1");

            assert_eq!(entry.source_id, "x1");
            assert_eq!(entry.title, "Title x1");
            assert_eq!(entry.link, "http://example.com/x1");
            assert_eq!(entry.description, "Description");

            Ok(())
        });
    }

    #[test]
    fn create_ignores_duplicate_source_id() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let entry = insert_entry(connection, "x1");

            let duplicate = NewFeedEntry {
                source_id: "x1",
                title: "Other title",
                link: "http://example.com/other",
                published_at: db::current_time(),
                description: "",
            };

            let inserted = super::create(connection, &duplicate).unwrap();

            assert_eq!(inserted, 0);
            assert_eq!(super::count(connection).unwrap(), 1);
            assert_eq!(super::find_by_source_id(connection, "x1").unwrap(), Some(entry));

            Ok(())
        });
    }

    #[test]
    fn exists_checks_source_id() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            insert_entry(connection, "x1");

            assert!(super::exists(connection, "x1").unwrap());
            assert!(!super::exists(connection, "x2").unwrap());

            Ok(())
        });
    }

    #[test]
    fn find_entries_returns_all_entries_newest_first() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            for source_id in ["a", "b", "c"] {
                insert_entry(connection, source_id);
            }

            let result = super::find_entries(connection, None, None).unwrap();
            let source_ids: Vec<&str> = result
                .iter()
                .map(|item| item.entry.source_id.as_str())
                .collect();

            assert_eq!(source_ids, vec!["c", "b", "a"]);

            Ok(())
        });
    }

    #[test]
    fn find_entries_truncates_after_ordering() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            for source_id in ["a", "b", "c", "d", "e"] {
                insert_entry(connection, source_id);
            }

            let result = super::find_entries(connection, None, Some(2)).unwrap();
            let source_ids: Vec<&str> = result
                .iter()
                .map(|item| item.entry.source_id.as_str())
                .collect();

            assert_eq!(source_ids, vec!["e", "d"]);

            Ok(())
        });
    }

    #[test]
    fn find_entries_filters_by_tag_case_insensitively() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let first = insert_entry(connection, "a");
            let second = insert_entry(connection, "b");
            let third = insert_entry(connection, "c");

            let news = tags::find_or_create(connection, "news").unwrap();
            let rust = tags::find_or_create(connection, "rust").unwrap();

            tags::create_link(connection, first.id, news.id).unwrap();
            tags::create_link(connection, third.id, news.id).unwrap();
            tags::create_link(connection, third.id, rust.id).unwrap();
            tags::create_link(connection, second.id, rust.id).unwrap();

            let result = super::find_entries(connection, Some(" NEWS "), None).unwrap();

            assert_eq!(result.len(), 2);
            assert_eq!(result[0].entry, third);
            assert_eq!(result[0].tag_names(), vec!["news", "rust"]);
            assert_eq!(result[1].entry, first);
            assert_eq!(result[1].tag_names(), vec!["news"]);

            let limited = super::find_entries(connection, Some("rust"), Some(1)).unwrap();

            assert_eq!(limited.len(), 1);
            assert_eq!(limited[0].entry, third);

            Ok(())
        });
    }

    #[test]
    fn find_entries_returns_empty_result_for_unknown_or_unused_tag() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            insert_entry(connection, "a");
            tags::find_or_create(connection, "orphan").unwrap();

            assert!(super::find_entries(connection, Some("missing"), None)
                .unwrap()
                .is_empty());
            assert!(super::find_entries(connection, Some("orphan"), Some(3))
                .unwrap()
                .is_empty());

            Ok(())
        });
    }

    #[test]
    fn find_entries_is_deterministic() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            for source_id in ["a", "b", "c", "d"] {
                insert_entry(connection, source_id);
            }

            let first_run = super::find_entries(connection, None, Some(3)).unwrap();
            let second_run = super::find_entries(connection, None, Some(3)).unwrap();

            assert_eq!(first_run, second_run);

            Ok(())
        });
    }

    #[test]
    fn find_entries_reports_storage_failures_for_tag_lookup() {
        let mut connection = db::establish_test_connection();
        insert_entry(&mut connection, "a");

        diesel::sql_query("DROP TABLE tags")
            .execute(&mut connection)
            .unwrap();

        assert!(super::find_entries(&mut connection, Some("news"), None).is_err());
    }
}
